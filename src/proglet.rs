//! The per-proglet orchestrator.
//!
//! A proglet contributes at most two things the pipeline cares about: an
//! optional custom translator for its dialect and an optional functions
//! namespace its student code may call without importing. Both arrive
//! explicitly through a [`ProgletDescriptor`] - the orchestrator never
//! guesses unit names that were not declared to it.

use std::path::{ Path, PathBuf };
use pipe_trait::Pipe ;
use thiserror::Error ;
use tracing::{ debug, warn };

use crate::compiler::{ unit_source_path, Compiler, ConfigurationError, NotCompiled };
use crate::diagnostics::Diagnostic ;
use crate::host::{ CompilationIds, Host };
use crate::loader::{ LoadError, ModuleLoader };
use crate::runnable::{ CompiledRunnable, InstantiateError };
use crate::source::SourceUnit ;
use crate::toolchain::Toolchain ;
use crate::translate::{ TranslateError, Translator };



/// Builds a proglet-specific translator over the given pseudo-source file.
pub type TranslatorFactory =
	Box<dyn Fn( &Path, &CompilationIds ) -> Result<Translator, TranslateError> + Send + Sync>;

/// What a proglet declares to the pipeline.
pub struct ProgletDescriptor {
	name: String,
	translator: Option<TranslatorFactory>,
	functions: Option<String>,
}

impl std::fmt::Debug for ProgletDescriptor {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ProgletDescriptor" )
			.field( "name", &self.name )
			.field( "translator", &self.translator.as_ref().map(| _ | "<factory>" ))
			.field( "functions", &self.functions )
			.finish()
	}
}

impl ProgletDescriptor {

	/// Describes a proglet with no custom translator and no functions
	/// namespace - plain JVS.
	pub fn new( name: impl Into<String> ) -> Self {
		Self { name: name.into(), translator: None, functions: None }
	}

	/// Declares a factory for the proglet's own translator.
	///
	/// If the factory fails at compile time, the pipeline logs the failure
	/// and falls back to the default translator rather than refusing the
	/// student's code.
	pub fn with_translator(
		mut self,
		factory: impl Fn( &Path, &CompilationIds ) -> Result<Translator, TranslateError> + Send + Sync + 'static,
	) -> Self {
		self.translator = Some( Box::new( factory ));
		self
	}

	/// Declares the fully qualified name of the proglet's functions
	/// namespace unit.
	///
	/// The unit is only probed for, never required: when it resolves, a
	/// static wildcard import of it is added to every compiled source.
	pub fn with_functions( mut self, unit_name: impl Into<String> ) -> Self {
		self.functions = Some( unit_name.into() );
		self
	}

	/// The proglet's identifier.
	#[inline] pub fn name( &self ) -> &str { &self.name }

	/// The declared functions namespace, if any.
	#[inline] pub fn functions( &self ) -> Option<&str> { self.functions.as_deref() }

}

/// A failure anywhere in the orchestrated pipeline, except compilation
/// proper - toolchain findings come back as diagnostics, not as errors.
#[derive( Debug, Error )]
pub enum ProgletError {
	/// The source file or a directory failed validation.
	#[error( transparent )] Configuration( #[from] ConfigurationError ),
	/// Translation of the pseudo-source failed.
	#[error( transparent )] Translate( #[from] TranslateError ),
	/// Literal code could not be written out for compilation.
	#[error( "cannot materialize literal source: {0}" )] Materialize( #[source] std::io::Error ),
	/// The generated host source could not be written next to the original.
	#[error( "cannot write generated source {}: {cause}", .path.display() )]
	GeneratedSource { path: PathBuf, #[source] cause: std::io::Error },
	/// A runnable was requested before any successful [`compile`]( ProgletCompiler::compile ).
	#[error( transparent )] NotCompiled( #[from] NotCompiled ),
	/// The generated unit could not be resolved after compilation.
	#[error( transparent )] Load( #[from] LoadError ),
	/// The generated unit could not be instantiated as a runnable.
	#[error( transparent )] Instantiate( #[from] InstantiateError ),
}

/// Orchestrates translate → compile → load → instantiate for one source.
pub struct ProgletCompiler {
	descriptor: ProgletDescriptor,
	host: Host,
	toolchain: Toolchain,
	source_path: PathBuf,
	compiled: Option<Compiled>,
}

struct Compiled {
	facade: Compiler,
	unit_name: String,
}

impl std::fmt::Debug for ProgletCompiler {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ProgletCompiler" )
			.field( "descriptor", &self.descriptor )
			.field( "source_path", &self.source_path )
			.field( "compiled", &self.compiled.as_ref().map(| compiled | &compiled.unit_name ))
			.finish_non_exhaustive()
	}
}

impl ProgletCompiler {

	/// Creates a pipeline over an existing pseudo-source file.
	///
	/// # Errors
	/// [`ProgletError::Configuration`] if `path` is missing or a directory.
	pub fn from_file( descriptor: ProgletDescriptor, path: impl Into<PathBuf> ) -> Result<Self, ProgletError> {
		let path = path.into();
		if path.is_dir() {
			return Err( ConfigurationError::NotAFile( path ).into() );
		}
		if !path.exists() {
			return Err( ConfigurationError::MissingFile( path ).into() );
		}
		let path = path.canonicalize().unwrap_or( path );
		Ok( Self::assemble( descriptor, path ))
	}

	/// Creates a pipeline over literal pseudo-source.
	///
	/// The code is written into a scratch directory named after its
	/// content hash, so recompiling identical code reuses the same
	/// directory while each call still gets a fresh file.
	///
	/// # Errors
	/// [`ProgletError::Materialize`] if the scratch file cannot be
	/// created.
	pub fn from_code( descriptor: ProgletDescriptor, code: &str ) -> Result<Self, ProgletError> {
		let scratch = std::env::temp_dir()
			.join( "jvs-host" )
			.join( code.pipe( content_hash ).pipe(| hash | format!( "{:016x}-compile", hash )));
		std::fs::create_dir_all( &scratch ).map_err( ProgletError::Materialize )?;
		let unit = SourceUnit::materialize( code, &scratch ).map_err( ProgletError::Materialize )?;
		Ok( Self::assemble( descriptor, unit.path().to_path_buf() ))
	}

	fn assemble( descriptor: ProgletDescriptor, source_path: PathBuf ) -> Self {
		Self {
			descriptor,
			host: Host::new(),
			toolchain: Toolchain::default(),
			source_path,
			compiled: None,
		}
	}

	/// Shares the host context: engine, id source and registries.
	pub fn with_host( mut self, host: Host ) -> Self {
		self.host = host ;
		self
	}

	/// Replaces the toolchain handed to the compiler façade.
	pub fn with_toolchain( mut self, toolchain: Toolchain ) -> Self {
		self.toolchain = toolchain ;
		self
	}

	/// The proglet this pipeline compiles for.
	#[inline] pub fn descriptor( &self ) -> &ProgletDescriptor { &self.descriptor }

	/// The pseudo-source file driving the pipeline.
	#[inline] pub fn source_path( &self ) -> &Path { &self.source_path }

	/// The fully qualified generated unit name, once compiled.
	pub fn unit_name( &self ) -> Option<&str> {
		self.compiled.as_ref().map(| compiled | compiled.unit_name.as_str() )
	}

	/// Runs translate → compile over the source.
	///
	/// The generated host source is persisted next to the original for
	/// inspection, then the façade drives the toolchain in place. The
	/// returned diagnostics are the compilation's entire verdict: an empty
	/// list means the unit is ready to [`runnable`]( Self::runnable ).
	///
	/// # Errors
	/// Translation and validation failures; never toolchain findings.
	pub fn compile( &mut self ) -> Result<Vec<Diagnostic>, ProgletError> {

		let mut translator = self.select_translator()?;
		translator.add_default_imports();
		self.augment_functions( &mut translator );

		let generated = translator.generated_source()?;
		let unit_name = translator.full_class_name();
		let src_dir = self.source_dir();

		let host_source = src_dir.join( unit_source_path( &unit_name ));
		if let Some( dir ) = host_source.parent() {
			std::fs::create_dir_all( dir )
				.map_err(| cause | ProgletError::GeneratedSource { path: host_source.clone(), cause })?;
		}
		std::fs::write( &host_source, &generated )
			.map_err(| cause | ProgletError::GeneratedSource { path: host_source.clone(), cause })?;

		let mut facade = Compiler::for_unit( &src_dir, &unit_name )?
			.with_host( self.host.clone() )
			.with_toolchain( self.toolchain.clone() );
		let diagnostics = facade.compile()?;
		self.compiled = Some( Compiled { facade, unit_name });
		Ok( diagnostics )

	}

	/// Resolves the generated unit and instantiates it as a runnable.
	///
	/// # Errors
	/// [`ProgletError::NotCompiled`] before a [`compile`]( Self::compile );
	/// afterwards, load and instantiation failures with their causes kept
	/// apart (not found vs wrong shape vs broken construction).
	pub fn runnable( &self ) -> Result<CompiledRunnable, ProgletError> {
		let Compiled { facade, unit_name } = self.compiled.as_ref().ok_or( NotCompiled )?;
		let module = facade.module_loader()?.resolve( unit_name )?;
		Ok( CompiledRunnable::instantiate( self.host.engine(), unit_name, &module )? )
	}

	/// Picks the proglet's translator, falling back to the default on any
	/// factory failure.
	fn select_translator( &self ) -> Result<Translator, ProgletError> {
		if let Some( factory ) = &self.descriptor.translator {
			match factory( &self.source_path, self.host.ids() ) {
				Ok( translator ) => return Ok( translator ),
				Err( err ) => warn!(
					"custom translator of proglet {} failed ({}), using the default",
					self.descriptor.name, err,
				),
			}
		}
		let source = SourceUnit::read( &self.source_path )?;
		Ok( Translator::new( source, self.host.ids() ))
	}

	/// Probes for the proglet's functions namespace; absence is expected
	/// and never fails the pipeline.
	fn augment_functions( &self, translator: &mut Translator ) {
		let Some( functions ) = self.descriptor.functions() else { return };
		let probe = match ModuleLoader::new( self.host.clone(), self.source_dir() ) {
			Ok( probe ) => probe,
			Err( _ ) => return,
		};
		match probe.resolve( functions ) {
			Ok( _ ) => translator.add_import( format!( "{}.*", functions ), true ),
			Err( err ) => debug!( "no functions namespace for proglet {}: {}", self.descriptor.name, err ),
		}
	}

	fn source_dir( &self ) -> PathBuf {
		match self.source_path.parent() {
			Some( dir ) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
			_ => PathBuf::from( "." ),
		}
	}

}

/// Stable-enough tag for a scratch directory: identical code maps to the
/// same directory on purpose.
fn content_hash( code: &str ) -> u64 {
	use std::hash::{ Hash, Hasher };
	let mut hasher = std::collections::hash_map::DefaultHasher::new();
	code.hash( &mut hasher );
	hasher.finish()
}

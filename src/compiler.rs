//! The compiler façade.
//!
//! A [`Compiler`] owns one batch of host-source files under a source root,
//! drives the external [`Toolchain`]( crate::Toolchain ) over them and binds a
//! [`ModuleLoader`] to wherever the compiled units land. Everything the
//! toolchain complains about comes back as an ordered
//! [`Diagnostic`]( crate::Diagnostic ) list - the only errors *thrown* here
//! are configuration mistakes caught before the toolchain ever runs.

use std::path::{ Path, PathBuf };
use thiserror::Error ;

use crate::diagnostics::Diagnostic ;
use crate::host::Host ;
use crate::loader::ModuleLoader ;
use crate::toolchain::Toolchain ;



/// Extension of generated host-language sources.
pub const HOST_EXTENSION: &str = "java" ;

/// A root directory or source file failed validation at construction.
///
/// These fail fast and are never retried - a façade over a broken layout is
/// useless, so it refuses to exist.
#[derive( Debug, Error )]
pub enum ConfigurationError {
	/// The directory does not exist.
	#[error( "missing directory: {}", .0.display() )] MissingDirectory( PathBuf ),
	/// A file sits where a directory is required.
	#[error( "{} is a file, not a directory", .0.display() )] NotADirectory( PathBuf ),
	/// The source file does not exist.
	#[error( "missing source file: {}", .0.display() )] MissingFile( PathBuf ),
	/// A directory sits where a file is required.
	#[error( "{} is a directory, not a file", .0.display() )] NotAFile( PathBuf ),
	/// The recursive source scan failed mid-walk.
	#[error( "cannot scan {}: {cause}", .dir.display() )] Unscannable { dir: PathBuf, #[source] cause: std::io::Error },
}

/// Asked for compiled state before any compilation happened.
#[derive( Debug, Error )]
#[error( "no compiled units yet: compile() has not been run" )]
pub struct NotCompiled ;

/// Drives the external toolchain over one batch of sources.
pub struct Compiler {
	src_dir: PathBuf,
	sources: Vec<PathBuf>,
	toolchain: Toolchain,
	host: Host,
	loader: Option<ModuleLoader>,
}

impl std::fmt::Debug for Compiler {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Compiler" )
			.field( "src_dir", &self.src_dir )
			.field( "sources", &self.sources )
			.field( "toolchain", &self.toolchain )
			.field( "compiled", &self.loader.is_some() )
			.finish_non_exhaustive()
	}
}

impl Compiler {

	/// Creates a façade over an explicit list of source files.
	///
	/// Relative paths are resolved against `directory`; every file must
	/// exist and not be a directory.
	///
	/// # Errors
	/// [`ConfigurationError`] if the directory or any file fails validation.
	pub fn new(
		directory: impl Into<PathBuf>,
		files: impl IntoIterator<Item = impl Into<PathBuf>>,
	) -> Result<Self, ConfigurationError> {
		let src_dir = directory.into();
		Self::assert_directory( &src_dir )?;
		let mut sources = Vec::with_capacity( 0 );
		for file in files {
			let file = file.into();
			let file = match file.is_absolute() {
				true => file,
				false => src_dir.join( file ),
			};
			Self::assert_file( &file )?;
			sources.push( file );
		}
		Ok( Self::assemble( src_dir, sources ))
	}

	/// Creates a façade over a single fully-qualified unit name.
	///
	/// `a.b.C` is looked up as `a/b/C.java` under `directory`.
	///
	/// # Errors
	/// [`ConfigurationError`] if the directory or derived file fails
	/// validation.
	pub fn for_unit( directory: impl Into<PathBuf>, unit_name: &str ) -> Result<Self, ConfigurationError> {
		let src_dir = directory.into();
		Self::assert_directory( &src_dir )?;
		let source = src_dir.join( unit_source_path( unit_name ));
		Self::assert_file( &source )?;
		Ok( Self::assemble( src_dir, vec![ source ]))
	}

	/// Creates a façade over every host source found under `directory`,
	/// recursively, in stable (sorted) order.
	///
	/// # Errors
	/// [`ConfigurationError`] if the directory fails validation or cannot
	/// be walked.
	pub fn all_units( directory: impl Into<PathBuf> ) -> Result<Self, ConfigurationError> {
		let src_dir = directory.into();
		Self::assert_directory( &src_dir )?;
		let mut sources = Vec::with_capacity( 0 );
		Self::scan_sources( &src_dir, &mut sources )
			.map_err(| cause | ConfigurationError::Unscannable { dir: src_dir.clone(), cause })?;
		sources.sort();
		Ok( Self::assemble( src_dir, sources ))
	}

	fn assemble( src_dir: PathBuf, sources: Vec<PathBuf> ) -> Self {
		Self {
			src_dir,
			sources,
			toolchain: Toolchain::default(),
			host: Host::new(),
			loader: None,
		}
	}

	/// Replaces the default toolchain.
	pub fn with_toolchain( mut self, toolchain: Toolchain ) -> Self {
		self.toolchain = toolchain ;
		self
	}

	/// Shares the host context - its engine and registries back the bound
	/// module loader.
	pub fn with_host( mut self, host: Host ) -> Self {
		self.host = host ;
		self
	}

	/// The source root the batch is resolved against.
	#[inline] pub fn src_dir( &self ) -> &Path { &self.src_dir }

	/// The resolved source files of the batch.
	#[inline] pub fn sources( &self ) -> &[PathBuf] { &self.sources }

	/// Compiles in place: compiled units land next to their sources.
	///
	/// # Errors
	/// See [`compile_to`]( Self::compile_to ).
	pub fn compile( &mut self ) -> Result<Vec<Diagnostic>, ConfigurationError> {
		let out_dir = self.src_dir.clone();
		self.compile_to( out_dir )
	}

	/// Compiles the batch into `out_dir`, which must already exist.
	///
	/// Binds a fresh [`ModuleLoader`] to `out_dir` and returns the full
	/// diagnostic list; an empty list is the only success signal, and
	/// toolchain-reported failures never become `Err`.
	///
	/// # Errors
	/// [`ConfigurationError`] if `out_dir` is missing or not a directory.
	pub fn compile_to( &mut self, out_dir: impl Into<PathBuf> ) -> Result<Vec<Diagnostic>, ConfigurationError> {
		let out_dir = out_dir.into();
		Self::assert_directory( &out_dir )?;
		let relative: Vec<PathBuf> = self.sources.iter()
			.map(| source | source.strip_prefix( &self.src_dir )
				.map( Path::to_path_buf )
				.unwrap_or_else(|_| source.clone() ))
			.collect();
		self.loader = Some( ModuleLoader::new( self.host.clone(), &out_dir )? );
		Ok( self.toolchain.run( &self.src_dir, &out_dir, &relative ))
	}

	/// The loader bound to the last compilation's output directory.
	///
	/// # Errors
	/// [`NotCompiled`] if no compilation has run on this façade yet.
	pub fn module_loader( &self ) -> Result<&ModuleLoader, NotCompiled> {
		self.loader.as_ref().ok_or( NotCompiled )
	}

	fn assert_directory( directory: &Path ) -> Result<(), ConfigurationError> {
		if directory.is_file() {
			return Err( ConfigurationError::NotADirectory( directory.to_path_buf() ));
		}
		if !directory.exists() {
			return Err( ConfigurationError::MissingDirectory( directory.to_path_buf() ));
		}
		Ok(())
	}

	fn assert_file( file: &Path ) -> Result<(), ConfigurationError> {
		if file.is_dir() {
			return Err( ConfigurationError::NotAFile( file.to_path_buf() ));
		}
		if !file.exists() {
			return Err( ConfigurationError::MissingFile( file.to_path_buf() ));
		}
		Ok(())
	}

	fn scan_sources( dir: &Path, into: &mut Vec<PathBuf> ) -> std::io::Result<()> {
		for entry in std::fs::read_dir( dir )? {
			let path = entry?.path();
			if path.is_dir() {
				Self::scan_sources( &path, into )?;
			} else if path.extension().is_some_and(| extension | extension == HOST_EXTENSION ) {
				into.push( path );
			}
		}
		Ok(())
	}

}

/// Decomposes `a.b.C` into the relative source path `a/b/C.java`.
pub(crate) fn unit_source_path( unit_name: &str ) -> PathBuf {
	let mut path = PathBuf::new();
	let mut segments = unit_name.split( '.' ).peekable();
	while let Some( segment ) = segments.next() {
		match segments.peek() {
			Some( _ ) => path.push( segment ),
			None => path.push( format!( "{}.{}", segment, HOST_EXTENSION )),
		}
	}
	path
}

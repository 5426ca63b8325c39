//! Layered resolution of qualified names to loaded modules.

use std::collections::HashMap ;
use std::path::{ Path, PathBuf };
use std::sync::Mutex ;
use thiserror::Error ;
use tracing::debug ;
use wasmtime::{ Engine, Module };

use crate::compiler::ConfigurationError ;
use crate::host::Host ;



/// Extension of a compiled unit on disk.
pub const ARTIFACT_EXTENSION: &str = "wasm" ;

/// A qualified name could not be resolved to a loaded module.
#[derive( Debug, Error )]
pub enum LoadError {
	/// Nothing matched through any resolution tier; wraps the innermost
	/// disk-lookup failure.
	#[error( "no compiled unit for {name}: {cause}" )]
	NotFound { name: String, #[source] cause: std::io::Error },
	/// An artifact existed but could not be defined as a module.
	#[error( "defective compiled unit for {name}: {cause}" )]
	Defective { name: String, cause: wasmtime::Error },
}

/// Resolves qualified unit names, preferring what is already loaded.
///
/// Resolution tiers, each tried only when the previous one misses:
/// 1. this loader's own cache;
/// 2. the host's platform registry (built-ins, not copied into the cache -
///    they are already process-wide);
/// 3. the host's loaded-application registry (same reasoning);
/// 4. the compiled artifact under the configured root, read once, defined
///    as a fresh module and cached.
///
/// Tier 4 is what makes "compile once, run without restart" work: a unit
/// compiled a moment ago becomes invokable without touching anything the
/// process already runs. A name served from the cache is never re-read,
/// even if the artifact has changed or vanished since.
pub struct ModuleLoader {
	host: Host,
	root: PathBuf,
	cache: Mutex<HashMap<String, Module>>,
}

impl std::fmt::Debug for ModuleLoader {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ModuleLoader" )
			.field( "root", &self.root )
			.field( "cached", &self.cache.lock().map(| cache | cache.len() ).unwrap_or( 0 ))
			.finish_non_exhaustive()
	}
}

impl ModuleLoader {

	/// Creates a loader over the compiled artifacts under `root`.
	///
	/// # Errors
	/// [`ConfigurationError`] if `root` is missing or not a directory.
	pub fn new( host: Host, root: impl Into<PathBuf> ) -> Result<Self, ConfigurationError> {
		let root = root.into();
		if root.is_file() {
			return Err( ConfigurationError::NotADirectory( root ));
		}
		if !root.exists() {
			return Err( ConfigurationError::MissingDirectory( root ));
		}
		Ok( Self { host, root, cache: Mutex::new( HashMap::with_capacity( 0 ))})
	}

	/// The artifact root this loader reads from.
	#[inline] pub fn root( &self ) -> &Path { &self.root }

	/// The engine modules are defined against.
	#[inline] pub fn engine( &self ) -> &Engine { self.host.engine() }

	/// Resolves `name` through the tiers described on the type.
	///
	/// The cache lock is held across the disk tier, so concurrent callers
	/// racing on the same not-yet-cached name still produce at most one
	/// read and one definition.
	///
	/// # Errors
	/// [`LoadError`] when every tier misses or the artifact is unusable.
	pub fn resolve( &self, name: &str ) -> Result<Module, LoadError> {

		let mut cache = self.cache.lock().unwrap_or_else(| poisoned | poisoned.into_inner() );
		if let Some( module ) = cache.get( name ) {
			return Ok( module.clone() );
		}

		if let Some( module ) = self.host.platform().get( name ) {
			debug!( "{} resolved as a platform unit", name );
			return Ok( module );
		}
		debug!( "{} is not a platform unit", name );

		if let Some( module ) = self.host.loaded().get( name ) {
			debug!( "{} resolved as an already-loaded unit", name );
			return Ok( module );
		}
		debug!( "{} is not an already-loaded unit", name );

		let path = self.root.join( artifact_relative_path( name ));
		if !path.exists() {
			return Err( LoadError::NotFound {
				name: name.to_string(),
				cause: std::io::Error::new(
					std::io::ErrorKind::NotFound,
					format!( "no artifact at {}", path.display() ),
				),
			});
		}
		let bytes = std::fs::read( &path )
			.map_err(| cause | LoadError::NotFound { name: name.to_string(), cause })?;
		let module = Module::new( self.engine(), &bytes )
			.map_err(| cause | LoadError::Defective { name: name.to_string(), cause })?;
		debug!( "{} defined from {} ({} bytes)", name, path.display(), bytes.len() );
		cache.insert( name.to_string(), module.clone() );
		Ok( module )

	}

}

/// Decomposes `a.b.C` into the relative artifact path `a/b/C.wasm`.
pub(crate) fn artifact_relative_path( unit_name: &str ) -> PathBuf {
	let mut path = PathBuf::new();
	let mut segments = unit_name.split( '.' ).peekable();
	while let Some( segment ) = segments.next() {
		match segments.peek() {
			Some( _ ) => path.push( segment ),
			None => path.push( format!( "{}.{}", segment, ARTIFACT_EXTENSION )),
		}
	}
	path
}

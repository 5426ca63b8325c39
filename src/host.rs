//! Shared state of the long-running host process.
//!
//! A [`Host`] bundles everything that outlives a single compilation: the
//! wasmtime [`Engine`], the source of process-unique compilation ids, and the
//! two registries backing the loader's non-disk resolution tiers. It is a
//! handle type - cloning it creates another reference to the same underlying
//! state rather than duplicating it.

use std::sync::Arc ;
use std::sync::atomic::{ AtomicU64, Ordering };
use wasmtime::Engine ;

use crate::registry::ModuleRegistry ;



/// Source of process-unique ids for generated unit names.
///
/// Every [`Translator`]( crate::Translator ) is handed one of these at
/// construction and draws one id from it, so two translators sharing a source
/// can never produce the same generated class name. The counter only ever
/// moves forward; ids are not reused.
#[derive( Debug, Clone, Default )]
pub struct CompilationIds( Arc<AtomicU64> );

impl CompilationIds {

	/// Creates a fresh id source starting at 1.
	pub fn new() -> Self { Self::default() }

	/// Returns the next id. Safe to call from any number of threads.
	pub fn next( &self ) -> u64 {
		self.0.fetch_add( 1, Ordering::Relaxed ) + 1
	}

}

/// Shared context of the embedding process.
///
/// The `platform` registry holds units shipped with the host itself - always
/// resolvable, never re-read. The `loaded` registry holds units the embedding
/// application has already pulled into the process (proglet function
/// namespaces, previously compiled units kept alive). Both are consulted by
/// [`ModuleLoader::resolve`]( crate::ModuleLoader::resolve ) before any disk
/// lookup happens.
#[derive( Clone )]
pub struct Host {
	engine: Engine,
	ids: CompilationIds,
	platform: ModuleRegistry,
	loaded: ModuleRegistry,
}

impl std::fmt::Debug for Host {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Host" )
			.field( "engine", &"<Engine>" )
			.field( "ids", &self.ids )
			.field( "platform", &self.platform )
			.field( "loaded", &self.loaded )
			.finish()
	}
}

impl Default for Host {
	fn default() -> Self {
		Self {
			engine: Engine::default(),
			ids: CompilationIds::new(),
			platform: ModuleRegistry::new(),
			loaded: ModuleRegistry::new(),
		}
	}
}

impl Host {

	/// Creates a host context with a default engine and empty registries.
	pub fn new() -> Self { Self::default() }

	/// Creates a host context around an existing engine.
	///
	/// Use this when the embedding application configures its own
	/// [`Engine`]; all modules defined through this host share it.
	pub fn with_engine( engine: Engine ) -> Self {
		Self {
			engine,
			ids: CompilationIds::new(),
			platform: ModuleRegistry::new(),
			loaded: ModuleRegistry::new(),
		}
	}

	/// The wasmtime engine all of this host's modules are defined against.
	#[inline] pub fn engine( &self ) -> &Engine { &self.engine }

	/// The id source used for generated unit names.
	#[inline] pub fn ids( &self ) -> &CompilationIds { &self.ids }

	/// Built-in units shipped with the host runtime.
	#[inline] pub fn platform( &self ) -> &ModuleRegistry { &self.platform }

	/// Units already loaded by the embedding application.
	#[inline] pub fn loaded( &self ) -> &ModuleRegistry { &self.loaded }

}

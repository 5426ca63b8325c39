//! Name-keyed registries of already-defined modules.

use std::collections::HashMap ;
use std::sync::{ Arc, RwLock };
use wasmtime::Module ;



/// A shared mapping from qualified unit names to defined modules.
///
/// Registries back the loader's platform and application tiers: units found
/// here are already part of the process and are returned as-is, without being
/// copied into any per-loader cache. Like [`Host`]( crate::Host ), a registry
/// is a handle - clones share the same underlying map.
#[derive( Clone, Default )]
pub struct ModuleRegistry {
	units: Arc<RwLock<HashMap<String, Module>>>,
}

impl std::fmt::Debug for ModuleRegistry {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		let units = self.units.read()
			.unwrap_or_else(| poisoned | poisoned.into_inner() );
		f.debug_struct( "ModuleRegistry" )
			.field( "units", &units.keys().collect::<Vec<_>>() )
			.finish()
	}
}

impl ModuleRegistry {

	/// Creates an empty registry.
	pub fn new() -> Self { Self::default() }

	/// Registers `module` under the qualified `name`, replacing any
	/// previous entry with that name.
	pub fn register( &self, name: impl Into<String>, module: Module ) {
		self.units.write()
			.unwrap_or_else(| poisoned | poisoned.into_inner() )
			.insert( name.into(), module );
	}

	/// Returns the module registered under `name`, if any.
	///
	/// Modules are reference counted internally, so the returned clone is
	/// cheap and shares compiled code with the registered entry.
	pub fn get( &self, name: &str ) -> Option<Module> {
		self.units.read()
			.unwrap_or_else(| poisoned | poisoned.into_inner() )
			.get( name )
			.cloned()
	}

	/// Returns `true` if a unit is registered under `name`.
	pub fn contains( &self, name: &str ) -> bool {
		self.units.read()
			.unwrap_or_else(| poisoned | poisoned.into_inner() )
			.contains_key( name )
	}

}

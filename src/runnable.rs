//! Instantiation of compiled units.

use itertools::Itertools ;
use thiserror::Error ;
use wasmtime::{ Engine, Instance, Module, Store, TypedFunc };



/// Export every runnable unit must provide: a function taking and returning
/// nothing.
pub const ENTRY_EXPORT: &str = "run" ;

/// A compiled unit was resolved but cannot serve as a runnable instance.
///
/// The three variants keep "this unit has the wrong shape" apart from "this
/// unit's own code is broken", so callers can report a proglet authoring
/// mistake differently from a generated-code crash.
#[derive( Debug, Error )]
pub enum InstantiateError {
	/// The unit exports no niladic `run` entry point, or exports one with
	/// the wrong signature.
	#[error( "unit {name} is not runnable: {cause}" )]
	NotRunnable { name: String, cause: wasmtime::Error },
	/// The unit cannot be constructed without arguments: it declares
	/// imports the host does not supply.
	#[error( "unit {name} cannot be constructed, it imports: {imports}" )]
	Inaccessible { name: String, imports: String },
	/// Constructing the unit ran its own code and that code failed.
	#[error( "constructing unit {name} failed: {cause}" )]
	Failed { name: String, cause: wasmtime::Error },
}

/// An instantiated unit satisfying the runnable capability.
///
/// Owns its store, so the unit's state lives exactly as long as this value.
pub struct CompiledRunnable {
	name: String,
	store: Store<()>,
	entry: TypedFunc<(), ()>,
}

impl std::fmt::Debug for CompiledRunnable {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "CompiledRunnable" )
			.field( "name", &self.name )
			.finish_non_exhaustive()
	}
}

impl CompiledRunnable {

	/// Instantiates `module` on a fresh store and checks the runnable
	/// capability.
	///
	/// # Errors
	/// [`InstantiateError`], with the failure class preserved: wrong
	/// shape, unsatisfiable imports, or a failure inside the unit's own
	/// construction.
	pub(crate) fn instantiate( engine: &Engine, name: &str, module: &Module ) -> Result<Self, InstantiateError> {

		let imports = module.imports()
			.map(| import | format!( "{}/{}", import.module(), import.name() ))
			.join( ", " );
		if !imports.is_empty() {
			return Err( InstantiateError::Inaccessible { name: name.to_string(), imports });
		}

		let mut store = Store::new( engine, ());
		let instance = Instance::new( &mut store, module, &[] )
			.map_err(| cause | InstantiateError::Failed { name: name.to_string(), cause })?;
		let entry = instance.get_typed_func::<(), ()>( &mut store, ENTRY_EXPORT )
			.map_err(| cause | InstantiateError::NotRunnable { name: name.to_string(), cause })?;

		Ok( Self { name: name.to_string(), store, entry })

	}

	/// The fully qualified name of the instantiated unit.
	#[inline] pub fn name( &self ) -> &str { &self.name }

	/// Invokes the unit's entry point, surfacing any trap it raises.
	///
	/// # Errors
	/// The trap or host error raised by the unit's code.
	pub fn run( &mut self ) -> Result<(), wasmtime::Error> {
		self.entry.call( &mut self.store, () )
	}

}

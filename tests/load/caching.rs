use jvs_host::{ Host, Module, ModuleLoader };

#[test]
fn disk_resolved_units_are_never_read_twice() {

	let host = Host::new();
	let root = tempfile::tempdir().unwrap();
	let artifact = root.path().join( "demo/App.wasm" );
	crate::support::write_file( &artifact, crate::support::RUNNABLE_WAT );

	let loader = ModuleLoader::new( host, root.path() ).unwrap();
	loader.resolve( "demo.App" ).unwrap();

	// A second resolution must come from the cache: with the artifact gone,
	// any repeat disk read would fail loudly.
	std::fs::remove_file( &artifact ).unwrap();
	assert!( loader.resolve( "demo.App" ).is_ok() );

}

#[test]
fn registry_hits_are_not_copied_into_the_cache() {

	let host = Host::new();
	let root = tempfile::tempdir().unwrap();
	let loader = ModuleLoader::new( host.clone(), root.path() ).unwrap();

	let exporting = Module::new( host.engine(), crate::support::RUNNABLE_WAT ).unwrap();
	host.loaded().register( "proglets.turtle.Functions", exporting );
	assert_eq!( loader.resolve( "proglets.turtle.Functions" ).unwrap().exports().len(), 1 );

	// Replacing the registered unit must be visible through the same
	// loader - a cached copy would keep serving the old module.
	let bare = Module::new( host.engine(), crate::support::BARE_WAT ).unwrap();
	host.loaded().register( "proglets.turtle.Functions", bare );
	assert_eq!( loader.resolve( "proglets.turtle.Functions" ).unwrap().exports().len(), 0 );

}

#[test]
fn concurrent_resolution_of_one_name_defines_it_once() {

	let host = Host::new();
	let root = tempfile::tempdir().unwrap();
	let artifact = root.path().join( "demo/App.wasm" );
	crate::support::write_file( &artifact, crate::support::RUNNABLE_WAT );

	let loader = std::sync::Arc::new( ModuleLoader::new( host, root.path() ).unwrap() );
	let handles: Vec<_> = ( 0..4 )
		.map(| _ | {
			let loader = loader.clone();
			std::thread::spawn( move || loader.resolve( "demo.App" ).map(| _ | () ))
		})
		.collect();
	for handle in handles {
		handle.join().unwrap().unwrap();
	}

	// Whoever lost the race must still have been answered from the cache;
	// deleting the artifact afterwards proves nothing re-reads it.
	std::fs::remove_file( &artifact ).unwrap();
	assert!( loader.resolve( "demo.App" ).is_ok() );

}

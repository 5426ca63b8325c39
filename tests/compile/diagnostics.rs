use jvs_host::{ Compiler, ConfigurationError, Severity, Toolchain };

fn broken_batch() -> ( tempfile::TempDir, Compiler ) {
	let dir = tempfile::tempdir().unwrap();
	crate::support::write_file( &dir.path().join( "Broken.java" ), "class Broken { ??? }" );
	let facade = Compiler::new( dir.path(), [ "Broken.java" ]).unwrap();
	( dir, facade )
}

#[test]
fn reported_diagnostics_come_back_parsed_and_ordered() {

	let ( _dir, facade ) = broken_batch();
	let mut facade = facade.with_toolchain( crate::support::reporting_toolchain() );

	let diagnostics = facade.compile().unwrap();
	assert_eq!( diagnostics.len(), 2 );

	assert_eq!( diagnostics[0].severity(), Severity::Error );
	assert_eq!( diagnostics[0].line(), Some( 3 ));
	assert_eq!( diagnostics[0].message(), "missing return statement" );
	assert!( diagnostics[0].unit().unwrap().ends_with( "Broken.java" ));

	assert_eq!( diagnostics[1].severity(), Severity::Warning );
	assert_eq!( diagnostics[1].line(), Some( 7 ));

}

#[test]
fn identical_batches_report_identical_diagnostics() {

	let ( _dir, facade ) = broken_batch();
	let mut facade = facade.with_toolchain( crate::support::reporting_toolchain() );

	let first = facade.compile().unwrap();
	let second = facade.compile().unwrap();
	assert_eq!( first, second );

}

#[test]
fn unparseable_toolchain_failure_synthesizes_one_error() {

	let ( _dir, facade ) = broken_batch();
	let mut facade = facade.with_toolchain( crate::support::failing_toolchain() );

	let diagnostics = facade.compile().unwrap();
	assert_eq!( diagnostics.len(), 1 );
	assert_eq!( diagnostics[0].severity(), Severity::Error );
	assert!( diagnostics[0].message().contains( "failed" ), "got: {}", diagnostics[0] );

}

#[test]
fn unstartable_toolchain_synthesizes_one_error() {

	let ( _dir, facade ) = broken_batch();
	let mut facade = facade.with_toolchain( Toolchain::new( test_data_path!( "bin", "no-such-compiler" )));

	let diagnostics = facade.compile().unwrap();
	assert_eq!( diagnostics.len(), 1 );
	assert!( diagnostics[0].message().contains( "cannot start" ), "got: {}", diagnostics[0] );

}

#[test]
fn clean_compilation_reports_nothing_and_binds_the_loader() {

	let ( dir, facade ) = broken_batch();
	let mut facade = facade.with_toolchain( crate::support::emitting_toolchain( crate::support::EMIT_RUNNABLE ));

	let diagnostics = facade.compile().unwrap();
	assert!( diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics );

	let loader = facade.module_loader().unwrap();
	assert_eq!( loader.root(), dir.path() );

}

#[test]
fn output_directory_is_validated_before_compiling() {

	let ( dir, facade ) = broken_batch();
	let mut facade = facade.with_toolchain( crate::support::reporting_toolchain() );

	match facade.compile_to( dir.path().join( "nowhere" )) {
		Err( ConfigurationError::MissingDirectory( _ )) => {},
		Err( err ) => panic!( "unexpected error: {}", err ),
		Ok( _ ) => panic!( "expected failure" ),
	}

}

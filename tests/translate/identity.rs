use jvs_host::{ CompilationIds, SourceUnit, Translator };

#[test]
fn body_without_directives_is_preserved_verbatim() {

	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join( "Plain.jvs" );
	let body = "void main() {\n\tprintln( 1 + 1 );\n}\n";
	crate::support::write_file( &path, body );

	let ids = CompilationIds::new();
	let mut translator = Translator::new( SourceUnit::read( &path ).unwrap(), &ids );
	let generated = translator.generated_source().unwrap();

	assert!( generated.contains( body ), "body not preserved byte for byte:\n{}", generated );
	assert!(
		generated.starts_with( &format!( "public class {} {{", translator.class_name() )),
		"unexpected wrapper head:\n{}", generated,
	);
	assert!( generated.ends_with( "}// generated by jvs-host" ));

}

#[test]
fn entry_boilerplate_carries_the_compilation_id() {

	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join( "Plain.jvs" );
	crate::support::write_file( &path, "int x;\n" );

	let ids = CompilationIds::new();
	let generated = Translator::new( SourceUnit::read( &path ).unwrap(), &ids )
		.generated_source()
		.unwrap();

	assert!( generated.contains( "serialVersionUID = 1L;" ));
	assert!( generated.contains( "public void run()" ));
	assert!( generated.contains( "try{ main(); }" ));
	// Interruption is reported distinctly from any other failure.
	assert!( generated.contains( ".*Interrupted.*" ));

}

#[test]
fn non_breaking_spaces_are_normalized() {

	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join( "Plain.jvs" );
	crate::support::write_file( &path, "int\u{a0}x = 1;\n" );

	let ids = CompilationIds::new();
	let generated = Translator::new( SourceUnit::read( &path ).unwrap(), &ids )
		.generated_source()
		.unwrap();

	assert!( generated.contains( "int x = 1;" ));
	assert!( !generated.contains( '\u{a0}' ));

}

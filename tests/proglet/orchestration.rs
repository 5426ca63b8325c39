use jvs_host::{
	Host, Module, ProgletCompiler, ProgletDescriptor,
	SourceUnit, TranslateError, Translator,
};

#[test]
fn literal_code_compiles_and_runs_in_process() {

	let host = Host::new();
	let mut pipeline = ProgletCompiler::from_code(
		ProgletDescriptor::new( "ingredients" ),
		"void main() {\n\tint x = 1;\n}\n",
	).unwrap()
		.with_host( host )
		.with_toolchain( crate::support::emitting_toolchain( crate::support::EMIT_RUNNABLE ));

	let diagnostics = pipeline.compile().unwrap();
	assert!( diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics );

	let mut runnable = pipeline.runnable().unwrap();
	assert!( runnable.name().starts_with( "JvsSnippet" ));
	runnable.run().unwrap();

}

#[test]
fn generated_source_is_persisted_next_to_the_original() {

	let dir = tempfile::tempdir().unwrap();
	let source = dir.path().join( "Foo.jvs" );
	crate::support::write_file( &source, "void main() {\n}\n" );

	let mut pipeline = ProgletCompiler::from_file( ProgletDescriptor::new( "ingredients" ), &source )
		.unwrap()
		.with_toolchain( crate::support::emitting_toolchain( crate::support::EMIT_RUNNABLE ));
	pipeline.compile().unwrap();

	let unit_name = pipeline.unit_name().unwrap().to_string();
	assert!( unit_name.starts_with( "Foo" ));

	let persisted = dir.path().join( format!( "{}.java", unit_name ));
	let generated = std::fs::read_to_string( &persisted ).expect( "generated source on disk" );
	assert!( generated.contains( &format!( "public class {} ", unit_name )));
	assert!( generated.contains( "implements Runnable" ));
	assert!( generated.contains( "import static java.lang.Math.*;" ));

}

#[test]
fn declared_functions_namespace_is_imported_when_present() {

	let host = Host::new();
	let functions = Module::new( host.engine(), crate::support::RUNNABLE_WAT ).unwrap();
	host.loaded().register( "proglets.turtle.Functions", functions );

	let dir = tempfile::tempdir().unwrap();
	let source = dir.path().join( "Walk.jvs" );
	crate::support::write_file( &source, "void main() {\n}\n" );

	let descriptor = ProgletDescriptor::new( "turtle" ).with_functions( "proglets.turtle.Functions" );
	let mut pipeline = ProgletCompiler::from_file( descriptor, &source ).unwrap()
		.with_host( host )
		.with_toolchain( crate::support::emitting_toolchain( crate::support::EMIT_RUNNABLE ));
	pipeline.compile().unwrap();

	let persisted = dir.path().join( format!( "{}.java", pipeline.unit_name().unwrap() ));
	let generated = std::fs::read_to_string( persisted ).unwrap();
	assert!(
		generated.contains( "import static proglets.turtle.Functions.*;" ),
		"missing functions import:\n{}", generated,
	);

}

#[test]
fn absent_functions_namespace_is_silently_accepted() {

	let dir = tempfile::tempdir().unwrap();
	let source = dir.path().join( "Ghost.jvs" );
	crate::support::write_file( &source, "void main() {\n}\n" );

	let descriptor = ProgletDescriptor::new( "ghost" ).with_functions( "proglets.ghost.Functions" );
	let mut pipeline = ProgletCompiler::from_file( descriptor, &source ).unwrap()
		.with_toolchain( crate::support::emitting_toolchain( crate::support::EMIT_RUNNABLE ));

	let diagnostics = pipeline.compile().unwrap();
	assert!( diagnostics.is_empty() );

	let persisted = dir.path().join( format!( "{}.java", pipeline.unit_name().unwrap() ));
	let generated = std::fs::read_to_string( persisted ).unwrap();
	assert!( !generated.contains( "proglets.ghost.Functions" ));

}

#[test]
fn custom_translator_factory_is_honored() {

	let dir = tempfile::tempdir().unwrap();
	let source = dir.path().join( "Panel.jvs" );
	crate::support::write_file( &source, "void main() {\n}\n" );

	let descriptor = ProgletDescriptor::new( "panels" ).with_translator(| path, ids | {
		let mut translator = Translator::new( SourceUnit::read( path )?, ids );
		translator.set_parent_class( "Pane" );
		Ok( translator )
	});
	let mut pipeline = ProgletCompiler::from_file( descriptor, &source ).unwrap()
		.with_toolchain( crate::support::emitting_toolchain( crate::support::EMIT_RUNNABLE ));
	pipeline.compile().unwrap();

	let persisted = dir.path().join( format!( "{}.java", pipeline.unit_name().unwrap() ));
	let generated = std::fs::read_to_string( persisted ).unwrap();
	assert!( generated.contains( "extends Pane " ));

}

#[test]
fn failing_translator_factory_falls_back_to_the_default() {

	let dir = tempfile::tempdir().unwrap();
	let source = dir.path().join( "Flaky.jvs" );
	crate::support::write_file( &source, "void main() {\n}\n" );

	let descriptor = ProgletDescriptor::new( "flaky" )
		.with_translator(| _, _ | Err( TranslateError::Construction( "panel refused".to_string() )));
	let mut pipeline = ProgletCompiler::from_file( descriptor, &source ).unwrap()
		.with_toolchain( crate::support::emitting_toolchain( crate::support::EMIT_RUNNABLE ));

	let diagnostics = pipeline.compile().unwrap();
	assert!( diagnostics.is_empty() );
	pipeline.runnable().unwrap();

}

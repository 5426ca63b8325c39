macro_rules! test_data_path {
	($( $segment:expr ),+ $(,)?) => {{
		std::path::PathBuf::from( env!( "CARGO_MANIFEST_DIR" ))
			.join( "tests" )
			$(.join( $segment ))+
	}};
}

#[allow( dead_code )]
mod support {

	use std::path::{ Path, PathBuf };
	use once_cell::sync::Lazy ;

	static FAKE_COMPILER_DIR: Lazy<PathBuf> = Lazy::new(|| test_data_path!( "bin" ));

	/// Artifact shapes `emit.sh` can produce.
	pub const EMIT_RUNNABLE: &str = "runnable" ;
	pub const EMIT_NOT_RUNNABLE: &str = "not-runnable" ;
	pub const EMIT_TRAPPING: &str = "trapping" ;
	pub const EMIT_IMPORTING: &str = "importing" ;

	/// Textual module with a niladic `run` export; `Module::new` accepts
	/// it directly, and so does the disk tier of the loader.
	pub const RUNNABLE_WAT: &str = r#"(module (func (export "run")))"#;

	/// Textual module with no exports at all.
	pub const BARE_WAT: &str = "(module)" ;

	pub fn write_file( path: &Path, text: &str ) {
		if let Some( dir ) = path.parent() {
			std::fs::create_dir_all( dir ).expect( "fixture directory" );
		}
		std::fs::write( path, text ).expect( "fixture file" );
	}

	/// A stand-in batch compiler writing one artifact of the given shape
	/// per source unit.
	pub fn emitting_toolchain( shape: &str ) -> jvs_host::Toolchain {
		jvs_host::Toolchain::new( "sh" )
			.with_arg( fake_compiler( "emit.sh" ))
			.with_arg( shape )
	}

	/// A stand-in compiler reporting a fixed pair of diagnostics.
	pub fn reporting_toolchain() -> jvs_host::Toolchain {
		jvs_host::Toolchain::new( "sh" ).with_arg( fake_compiler( "report.sh" ))
	}

	/// A stand-in compiler that dies without a parseable report.
	pub fn failing_toolchain() -> jvs_host::Toolchain {
		jvs_host::Toolchain::new( "sh" ).with_arg( fake_compiler( "fail.sh" ))
	}

	fn fake_compiler( name: &str ) -> PathBuf {
		FAKE_COMPILER_DIR.join( name )
	}

}

//! External compiler toolchain invocation.

use std::ffi::OsString ;
use std::path::{ Path, PathBuf };
use std::process::Command ;
use tracing::debug ;

use crate::diagnostics::{ Diagnostic, Severity };



/// Program looked up on `PATH` when no toolchain is configured.
pub const DEFAULT_PROGRAM: &str = "jvsc" ;

/// Options passed on every invocation: warnings suppressed, fixed language
/// level, machine-parseable diagnostics.
const FIXED_OPTIONS: [ &str; 3 ] = [ "-nowarn", "-7", "-Xemacs" ];

/// The external batch compiler the façade drives.
///
/// A toolchain is a program plus leading arguments; every invocation appends
/// the fixed options, the output directory and the source files. The command
/// is run from the source root so relative source paths resolve naturally.
///
/// ```
/// use jvs_host::Toolchain ;
///
/// // A toolchain wrapped in an interpreter: `sh compiler.sh <options...>`.
/// let toolchain = Toolchain::new( "sh" ).with_arg( "compiler.sh" );
/// # let _ = toolchain ;
/// ```
#[derive( Debug, Clone )]
pub struct Toolchain {
	program: PathBuf,
	args: Vec<OsString>,
}

impl Default for Toolchain {
	fn default() -> Self { Self::new( DEFAULT_PROGRAM ) }
}

impl Toolchain {

	/// Creates a toolchain around `program`.
	pub fn new( program: impl Into<PathBuf> ) -> Self {
		Self { program: program.into(), args: Vec::with_capacity( 0 ) }
	}

	/// Appends an argument placed before the fixed options.
	pub fn with_arg( mut self, arg: impl Into<OsString> ) -> Self {
		self.args.push( arg.into() );
		self
	}

	/// The program invoked for each batch.
	#[inline] pub fn program( &self ) -> &Path { &self.program }

	/// Compiles `sources` (paths relative to `src_dir`) into `out_dir`,
	/// returning everything the toolchain reported, in order.
	///
	/// The call never fails: a toolchain that cannot be started, or exits
	/// unsuccessfully without reporting anything parseable, yields a single
	/// synthesized error diagnostic instead.
	pub(crate) fn run( &self, src_dir: &Path, out_dir: &Path, sources: &[PathBuf] ) -> Vec<Diagnostic> {

		debug!( "invoking {:?} on {} unit(s) under {}", self.program, sources.len(), src_dir.display() );
		let launched = Command::new( &self.program )
			.current_dir( src_dir )
			.args( &self.args )
			.args( FIXED_OPTIONS )
			.arg( "-d" )
			.arg( out_dir )
			.args( sources )
			.output();

		let output = match launched {
			Ok( output ) => output,
			Err( cause ) => return vec![ Diagnostic::new(
				Severity::Error,
				format!( "cannot start compiler toolchain {:?}: {}", self.program, cause ),
			)],
		};

		let mut diagnostics = Vec::with_capacity( 0 );
		for stream in [ &output.stderr, &output.stdout ] {
			diagnostics.extend(
				String::from_utf8_lossy( stream )
					.lines()
					.filter_map( Diagnostic::parse_line )
			);
		}
		if !output.status.success() && diagnostics.is_empty() {
			diagnostics.push( Diagnostic::new(
				Severity::Error,
				format!( "compiler toolchain {:?} failed: {}", self.program, output.status ),
			));
		}
		diagnostics

	}

}

//! Compiler diagnostics.
//!
//! Compilation problems are data, not control flow: the façade always
//! completes and hands back the full ordered list of what the toolchain
//! reported. An empty list is the only success signal.

use std::path::PathBuf ;
use std::sync::LazyLock ;
use regex::Regex ;



/// One machine-parseable diagnostic line: `path:line: severity: message`.
static REPORT_LINE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new( r"^(.+?):(\d+):\s*(error|warning|note):\s*(.*)$" ).expect( "report pattern" ));

/// How bad one diagnostic is.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum Severity {
	/// The unit did not compile cleanly.
	Error,
	/// Suspicious but compilable; normally suppressed by the fixed
	/// toolchain options, kept for toolchains that ignore them.
	Warning,
	/// Supplementary information attached to an earlier diagnostic.
	Note,
}

impl std::fmt::Display for Severity {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Error => write!( f, "error" ),
			Self::Warning => write!( f, "warning" ),
			Self::Note => write!( f, "note" ),
		}
	}
}

/// A single toolchain-reported message.
///
/// Diagnostics keep their emission order and are never deduplicated; two
/// identical messages mean the toolchain said it twice. The source unit and
/// line are optional - synthesized diagnostics (a toolchain that could not
/// even start) have neither.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Diagnostic {
	severity: Severity,
	unit: Option<PathBuf>,
	line: Option<u32>,
	message: String,
}

impl Diagnostic {

	/// Creates a diagnostic with no source location.
	pub fn new( severity: Severity, message: impl Into<String> ) -> Self {
		Self { severity, unit: None, line: None, message: message.into() }
	}

	/// Attaches the source unit the diagnostic refers to.
	pub fn with_unit( mut self, unit: impl Into<PathBuf> ) -> Self {
		self.unit = Some( unit.into() );
		self
	}

	/// Attaches the one-based source line.
	pub fn with_line( mut self, line: u32 ) -> Self {
		self.line = Some( line );
		self
	}

	/// Parses one line of toolchain output, if it is a diagnostic.
	pub fn parse_line( line: &str ) -> Option<Self> {
		let caps = REPORT_LINE.captures( line )?;
		let severity = match &caps[3] {
			"error" => Severity::Error,
			"warning" => Severity::Warning,
			_ => Severity::Note,
		};
		Some( Self {
			severity,
			unit: Some( PathBuf::from( &caps[1] )),
			line: caps[2].parse().ok(),
			message: caps[4].to_string(),
		})
	}

	/// The diagnostic's severity.
	#[inline] pub fn severity( &self ) -> Severity { self.severity }

	/// The source unit the diagnostic points at, when the toolchain said.
	#[inline] pub fn unit( &self ) -> Option<&std::path::Path> { self.unit.as_deref() }

	/// The one-based line, when the toolchain said.
	#[inline] pub fn line( &self ) -> Option<u32> { self.line }

	/// The message text.
	#[inline] pub fn message( &self ) -> &str { &self.message }

	/// Whether this diagnostic alone makes the compilation a failure.
	#[inline] pub fn is_error( &self ) -> bool { self.severity == Severity::Error }

}

impl std::fmt::Display for Diagnostic {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match ( &self.unit, self.line ) {
			( Some( unit ), Some( line )) => write!( f, "{}:{}: {}: {}", unit.display(), line, self.severity, self.message ),
			( Some( unit ), None ) => write!( f, "{}: {}: {}", unit.display(), self.severity, self.message ),
			_ => write!( f, "{}: {}", self.severity, self.message ),
		}
	}
}

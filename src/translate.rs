//! JVS to host-source translation.
//!
//! A [`Translator`] turns one pseudo-source unit (plus everything it
//! `include`s, recursively) into a single compilable host-language unit. The
//! pseudo-dialect is line-oriented: three directive forms are recognized by
//! pattern, every other line passes through untouched. Proglets that extend
//! the dialect plug a [`Dialect`] into the translator; the directive scan and
//! the class wrapping are shared by all dialects.

use std::path::PathBuf ;
use std::sync::LazyLock ;
use itertools::Itertools ;
use regex::Regex ;
use thiserror::Error ;
use tracing::warn ;

use crate::host::CompilationIds ;
use crate::source::{ SourceUnit, SOURCE_EXTENSION };



/// Matches a line holding a `package` or `import` declaration.
static DIRECTIVE_LINE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new( r"^\s*(import|package)[^;]*;\s*$" ).expect( "directive pattern" ));

/// Captures the dotted name of a `package` declaration.
static PACKAGE_LINE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new( r"^\s*package([^;]*);\s*$" ).expect( "package pattern" ));

/// Captures the target of an `include` directive.
static INCLUDE_LINE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new( r"^\s*include([^;]*);\s*$" ).expect( "include pattern" ));

/// Loose matcher for import-looking text anywhere in a line.
static IMPORT_SCAN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new( r"import\s+(?:(static)\s+)?([^;\s][^;]*?)\s*;" ).expect( "import pattern" ));

/// Errors raised while turning pseudo-source into a host unit.
///
/// Resolution failures inside *included* content do not surface here: they
/// degrade to an inline comment in the emitted body so that the rest of the
/// unit still reaches the compiler, whose diagnostics point at the damage.
/// Cycles are the exception - they would otherwise recurse forever, so they
/// abort the whole translation no matter how deep they are found.
#[derive( Debug, Error )]
pub enum TranslateError {
	/// The pseudo-source (or an included file) could not be read.
	#[error( "cannot read pseudo-source {}: {cause}", .path.display() )]
	Unreadable { path: PathBuf, #[source] cause: std::io::Error },
	/// No file matched an `include` directive of the root unit.
	#[error( "no file found for include: {name}" )]
	IncludeNotFound { name: String },
	/// An include chain reached a file that is still being spliced.
	#[error( "include cycle detected through {}", .path.display() )]
	CyclicInclude { path: PathBuf },
	/// A dialect-specific translator could not be constructed.
	#[error( "translator construction failed: {0}" )]
	Construction( String ),
}

/// A pseudo-syntax rewrite step applied before the directive scan.
///
/// The default dialect is the identity - plain JVS is already host syntax
/// apart from its directives. Proglets that introduce their own constructs
/// implement this trait and rewrite them into host syntax here; the rewrite
/// runs on the root unit and again on every included unit.
pub trait Dialect: Send + Sync {
	/// Rewrites one unit of pseudo-source into host-language body text.
	fn translate( &self, jvs: &str ) -> String ;
}

/// The identity dialect.
#[derive( Debug, Clone, Copy, Default )]
pub struct Plain ;

impl Dialect for Plain {
	fn translate( &self, jvs: &str ) -> String { jvs.to_string() }
}

/// A single import declaration of the generated unit.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Import {
	name: String,
	is_static: bool,
}

impl Import {

	/// Creates an import of `name`, optionally static.
	pub fn new( name: impl Into<String>, is_static: bool ) -> Self {
		Self { name: name.into(), is_static }
	}

	/// The imported name, possibly a wildcard.
	#[inline] pub fn name( &self ) -> &str { &self.name }

	/// Whether this is a static import.
	#[inline] pub fn is_static( &self ) -> bool { self.is_static }

	/// The declaration as it appears in the generated unit.
	pub fn render( &self ) -> String {
		format!( "import {}{};", match self.is_static { true => "static ", false => "" }, self.name )
	}

	/// Harvests every import-looking line of `text`.
	///
	/// Deliberately loose: included content and even commented-out lines
	/// contribute, and duplicates are kept - the host compiler tolerates
	/// repeated imports, and dropping any would change emission order.
	pub fn harvest( text: &str ) -> Vec<Import> {
		let mut imports = Vec::with_capacity( 0 );
		for line in text.split( '\n' ) {
			if !line.contains( "import " ) { continue }
			match IMPORT_SCAN.captures( line ) {
				Some( caps ) => imports.push( Import::new( &caps[2], caps.get( 1 ).is_some() )),
				None => warn!( "unreadable import instruction: {}", line.trim() ),
			}
		}
		imports
	}

}

/// Wrapper boilerplate emitted ahead of the translated body. The entry point
/// reports an interruption of the student's code distinctly from any other
/// failure.
const ENTRY_WRAPPER: &str = concat!(
	"  public static final long serialVersionUID = %$COMPILATION_ID$%L;",
	"  public void run() {",
	"   try{ main(); } catch(Throwable e) { ",
	"    if (e.toString().matches(\".*Interrupted.*\"))",
	"      System.out.println",
	"         (\"\\n-------------------\\nProgram stopped.\\n-------------------\\n\");",
	"    else ",
	"      System.out.println",
	"          (\"\\n-------------------\\nError while running the proglet\\n\"+",
	"           (e)+\"\\n-------------------\\n\");",
	"   }",
	"  }",
);

/// Translates one [`SourceUnit`] into a compilable host unit.
///
/// A translator is single-use state: it is created for one compilation, hands
/// out one generated class name, and is discarded with it. The generated name
/// is the unit's base name suffixed with an id drawn from the shared
/// [`CompilationIds`] source, so identically named units never collide inside
/// one process.
pub struct Translator {
	source: SourceUnit,
	id: u64,
	class_name: String,
	package: Option<String>,
	parent_class: Option<String>,
	capabilities: Vec<String>,
	imports: Vec<Import>,
	dialect: Box<dyn Dialect>,
}

impl std::fmt::Debug for Translator {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Translator" )
			.field( "source", &self.source.path() )
			.field( "class_name", &self.class_name )
			.field( "package", &self.package )
			.field( "imports", &self.imports )
			.field( "dialect", &"<dyn Dialect>" )
			.finish_non_exhaustive()
	}
}

impl Translator {

	/// Creates a translator over `source` with the identity dialect.
	pub fn new( source: SourceUnit, ids: &CompilationIds ) -> Self {
		let id = ids.next();
		let class_name = format!( "{}{}", source.base_name(), id );
		Self {
			source,
			id,
			class_name,
			package: None,
			parent_class: None,
			capabilities: Vec::with_capacity( 0 ),
			imports: Vec::with_capacity( 0 ),
			dialect: Box::new( Plain ),
		}
	}

	/// Replaces the dialect rewrite step.
	pub fn with_dialect( mut self, dialect: impl Dialect + 'static ) -> Self {
		self.dialect = Box::new( dialect );
		self
	}

	/// Adds an import to the generated unit.
	pub fn add_import( &mut self, name: impl Into<String>, is_static: bool ) {
		self.imports.push( Import::new( name, is_static ));
	}

	/// Removes the first configured import of `name`, returning it.
	pub fn remove_import( &mut self, name: &str ) -> Option<Import> {
		let position = self.imports.iter().position(| import | import.name() == name )?;
		Some( self.imports.remove( position ))
	}

	/// Adds a capability the generated class declares to implement.
	///
	/// Insertion order is preserved; duplicates are dropped at emission.
	pub fn add_capability( &mut self, name: impl Into<String> ) {
		self.capabilities.push( name.into() );
	}

	/// Sets the parent class of the generated unit.
	pub fn set_parent_class( &mut self, name: impl Into<String> ) {
		self.parent_class = Some( name.into() );
	}

	/// Adds the baseline every generated unit relies on: the host math
	/// namespace and the runnable capability the orchestrator expects.
	pub fn add_default_imports( &mut self ) {
		self.add_import( "java.lang.Math.*", true );
		self.add_capability( "Runnable" );
	}

	/// The unit this translator was created over.
	#[inline] pub fn source( &self ) -> &SourceUnit { &self.source }

	/// The generated class name, without package.
	#[inline] pub fn class_name( &self ) -> &str { &self.class_name }

	/// The package recorded by the last translation pass, if any.
	#[inline] pub fn package( &self ) -> Option<&str> { self.package.as_deref() }

	/// Imports configured so far (harvested ones are not recorded here).
	#[inline] pub fn imports( &self ) -> &[Import] { &self.imports }

	/// The fully qualified generated name, package included once a
	/// translation pass has recorded one.
	pub fn full_class_name( &self ) -> String {
		match self.package.as_deref() {
			Some( package ) if !package.is_empty() => format!( "{}.{}", package, self.class_name ),
			_ => self.class_name.clone(),
		}
	}

	/// Runs a full translation pass and returns the generated unit text.
	///
	/// # Errors
	/// Fails if an include of the root unit cannot be resolved or read, or
	/// if any include chain forms a cycle. Failures inside included
	/// content degrade to an inline comment instead.
	pub fn generated_source( &mut self ) -> Result<String, TranslateError> {
		let root = self.source.path().canonicalize()
			.unwrap_or_else(|_| self.source.path().to_path_buf() );
		let mut visited = vec![ root ];
		let mut harvested = Vec::with_capacity( 0 );
		let text = self.source.text().to_string();
		let body = self.render( &text, 0, &mut visited, &mut harvested )?;
		Ok( self.wrap( &body, &harvested ))
	}

	/// Translates one unit of text: dialect rewrite, artifact cleanup,
	/// then the line-by-line directive scan.
	fn render(
		&mut self,
		text: &str,
		depth: usize,
		visited: &mut Vec<PathBuf>,
		harvested: &mut Vec<Import>,
	) -> Result<String, TranslateError> {

		let text = self.dialect.translate( text ).replace( '\u{a0}', " " );
		harvested.extend( Import::harvest( &text ));

		// Trailing empty segments are not lines.
		let mut lines: Vec<&str> = text.split( '\n' ).collect();
		while lines.last() == Some( &"" ) { lines.pop(); }

		let mut body = String::new();
		for line in lines {
			if DIRECTIVE_LINE.is_match( line ) {
				if let Some( caps ) = PACKAGE_LINE.captures( line ) {
					let name = caps[1].trim();
					if !name.is_empty() { self.package = Some( name.to_string() ); }
				}
				body.push_str( "// " );
				body.push_str( line );
			} else if let Some( caps ) = INCLUDE_LINE.captures( line ) {
				let name = caps[1].trim().to_string();
				body.push_str( &format!( "/* include {}; */ ", name ));
				match self.splice_include( &name, depth, visited, harvested ) {
					Ok( spliced ) => body.push_str( &spliced ),
					Err( fatal @ TranslateError::CyclicInclude { .. } ) => return Err( fatal ),
					Err( err ) if depth == 0 => return Err( err ),
					// Block comment: a line comment would swallow the rest of
					// the line once the surrounding unit is flattened.
					Err( err ) => body.push_str( &format!( "/* error: {} */", err )),
				}
			} else {
				body.push_str( line );
			}
			body.push( '\n' );
		}
		Ok( body )

	}

	/// Resolves and recursively translates one include target, flattened
	/// onto a single line so it can replace the directive in place.
	fn splice_include(
		&mut self,
		name: &str,
		depth: usize,
		visited: &mut Vec<PathBuf>,
		harvested: &mut Vec<Import>,
	) -> Result<String, TranslateError> {

		let path = self.search_include( name )?;
		let marker = path.canonicalize().unwrap_or_else(|_| path.clone() );
		if visited.contains( &marker ) {
			return Err( TranslateError::CyclicInclude { path });
		}
		let text = std::fs::read_to_string( &path )
			.map_err(| cause | TranslateError::Unreadable { path: path.clone(), cause })?;

		visited.push( marker );
		let rendered = self.render( &text, depth + 1, visited, harvested );
		visited.pop();
		Ok( one_line( &rendered? ))

	}

	/// Resolves an include name to a file: each search directory is tried
	/// with the literal name and with the default extension appended, then
	/// the name itself is tried as a path. First existing match wins.
	fn search_include( &self, name: &str ) -> Result<PathBuf, TranslateError> {
		for dir in self.source.search_dirs() {
			let literal = dir.join( name );
			if literal.exists() { return Ok( literal ); }
			let with_extension = dir.join( format!( "{}.{}", name, SOURCE_EXTENSION ));
			if with_extension.exists() { return Ok( with_extension ); }
		}
		let literal = PathBuf::from( name );
		if literal.exists() { return Ok( literal ); }
		let with_extension = PathBuf::from( format!( "{}.{}", name, SOURCE_EXTENSION ));
		if with_extension.exists() { return Ok( with_extension ); }
		Err( TranslateError::IncludeNotFound { name: name.to_string() })
	}

	/// Encapsulates the translated body in a host class: package line,
	/// imports (configured first, then harvested), the class declaration
	/// and the entry-point boilerplate.
	fn wrap( &self, body: &str, harvested: &[Import] ) -> String {
		let mut unit = String::new();
		if let Some( package ) = &self.package {
			unit.push_str( &format!( "package {};", package ));
		}
		for import in self.imports.iter().chain( harvested ) {
			unit.push_str( &import.render() );
		}
		unit.push_str( &format!( "public class {} ", self.class_name ));
		if let Some( parent ) = &self.parent_class {
			unit.push_str( &format!( "extends {} ", parent ));
		}
		if !self.capabilities.is_empty() {
			unit.push_str( &format!( "implements {} ", self.capabilities.iter().unique().join( ", " )));
		}
		unit.push( '{' );
		unit.push_str( &ENTRY_WRAPPER.replace( "%$COMPILATION_ID$%", &self.id.to_string() ));
		unit.push_str( body );
		unit.push( '}' );
		unit.push_str( "// generated by jvs-host" );
		unit
	}

}

/// Flattens translated code onto one line. Lines carrying a line comment
/// are dropped entirely - the comment would swallow everything spliced
/// after it.
fn one_line( code: &str ) -> String {
	code.split( '\n' ).filter(| line | !line.contains( "//" )).join( "" )
}

//! A proglet runtime for running student code inside a long-running host.
//!
//! Students write **JVS**, an educational dialect of a mainstream
//! object-oriented language. `jvs_host` progressively turns one JVS unit into
//! something the host process can execute without restarting:
//!
//! 1. a [`Translator`] resolves the dialect's directives (`package`,
//! 	`import`, `include`) and wraps the body into a complete host-language
//! 	class with a runnable entry point;
//! 2. a [`Compiler`] façade drives an external [`Toolchain`] over the
//! 	generated source and collects its diagnostics - compilation problems
//! 	are data, never exceptions;
//! 3. a [`ModuleLoader`] resolves the generated unit name to a compiled
//! 	WebAssembly module, preferring its cache, then the host's built-in and
//! 	already-loaded units, then the artifact on disk;
//! 4. the orchestrating [`ProgletCompiler`] binds all of the above to one
//! 	proglet and instantiates the result as a [`CompiledRunnable`].
//!
//! # Core Concepts
//!
//! - [`Host`]: the shared state of the embedding process - the wasmtime
//! 	engine, the generated-name id source and the two module registries
//! 	backing the loader's non-disk tiers. A handle type; clone it freely.
//!
//! - [`ProgletDescriptor`]: what a proglet declares to the pipeline - an
//! 	optional factory for its own [`Translator`] and the optional name of
//! 	its functions namespace unit. Nothing is discovered by name-guessing;
//! 	whoever registers the proglet says what it provides.
//!
//! - [`SourceUnit`]: one pseudo-source file, snapshotted at construction
//! 	together with the directory list its includes are resolved against.
//!
//! - [`Diagnostic`]: one toolchain finding, in emission order. An empty
//! 	diagnostic list is the *only* success signal of a compilation.
//!
//! # Re-exports
//!
//! `jvs_host` re-exports a small set of types from `wasmtime` for
//! convenience (`Engine`, `Module`). These types are defined by wasmtime;
//! see the [wasmtime docs](https://docs.rs/wasmtime/latest/wasmtime/) for
//! details.
//!
//! # Example
//!
//! ```no_run
//! use jvs_host::{ Host, ProgletCompiler, ProgletDescriptor };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let host = Host::new();
//!
//! // A plain-dialect proglet: no custom translator, no functions namespace.
//! let descriptor = ProgletDescriptor::new( "ingredients" );
//!
//! let mut pipeline = ProgletCompiler::from_code( descriptor, r#"
//! void main() {
//! 	println( sqrt( 2 ));
//! }
//! "# )?.with_host( host.clone() );
//!
//! // Compilation never throws on bad student code - it reports.
//! let diagnostics = pipeline.compile()?;
//! if !diagnostics.is_empty() {
//! 	for diagnostic in &diagnostics { eprintln!( "{}", diagnostic ); }
//! 	return Ok(());
//! }
//!
//! // The freshly compiled unit runs inside this very process.
//! let mut runnable = pipeline.runnable()?;
//! runnable.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Dialects
//!
//! A proglet may rewrite pseudo-syntax of its own before the directive scan
//! by plugging a [`Dialect`] into the translator its descriptor builds:
//!
//! ```
//! use jvs_host::{ Dialect, ProgletDescriptor, SourceUnit, Translator };
//!
//! struct Arrows ;
//! impl Dialect for Arrows {
//! 	fn translate( &self, jvs: &str ) -> String {
//! 		jvs.replace( "<-", "=" )
//! 	}
//! }
//!
//! let descriptor = ProgletDescriptor::new( "arrows" )
//! 	.with_translator(| path, ids | {
//! 		let source = SourceUnit::read( path )?;
//! 		Ok( Translator::new( source, ids ).with_dialect( Arrows ))
//! 	});
//! # let _ = descriptor ;
//! ```

mod host ;
mod registry ;
mod source ;
mod translate ;
mod diagnostics ;
mod toolchain ;
mod compiler ;
mod loader ;
mod runnable ;
mod proglet ;

#[doc( no_inline )]
pub use wasmtime::{ Engine, Module };
#[doc( no_inline )]
pub use nonempty_collections::{ NEVec, nev };

pub use host::{ CompilationIds, Host };
pub use registry::ModuleRegistry ;
pub use source::{ SourceUnit, SOURCE_EXTENSION };
pub use translate::{ Dialect, Import, Plain, TranslateError, Translator };
pub use diagnostics::{ Diagnostic, Severity };
pub use toolchain::{ Toolchain, DEFAULT_PROGRAM };
pub use compiler::{ Compiler, ConfigurationError, NotCompiled, HOST_EXTENSION };
pub use loader::{ LoadError, ModuleLoader, ARTIFACT_EXTENSION };
pub use runnable::{ CompiledRunnable, InstantiateError, ENTRY_EXPORT };
pub use proglet::{ ProgletCompiler, ProgletDescriptor, ProgletError, TranslatorFactory };

//! JVS source units.

use std::io::Write ;
use std::path::{ Path, PathBuf };
use nonempty_collections::{ NEVec, nev };

use crate::translate::TranslateError ;



/// Default extension of a pseudo-source file, also tried when resolving
/// bare include names.
pub const SOURCE_EXTENSION: &str = "jvs" ;

/// One pseudo-source file, snapshotted at construction.
///
/// The file is read exactly once; later edits on disk are not observed by a
/// unit that has already been constructed. Each unit carries the ordered,
/// never-empty list of directories its `include` directives are resolved
/// against - first match wins.
#[derive( Debug, Clone )]
pub struct SourceUnit {
	path: PathBuf,
	text: String,
	search_dirs: NEVec<PathBuf>,
}

impl SourceUnit {

	/// Reads the unit at `path`, snapshotting its content.
	///
	/// The default search path is the file's parent directory, then the
	/// user's home directory, then the system temporary directory.
	///
	/// # Errors
	/// Returns [`TranslateError::Unreadable`] if the file cannot be read
	/// as UTF-8 text.
	pub fn read( path: impl Into<PathBuf> ) -> Result<Self, TranslateError> {
		let path = path.into();
		let text = std::fs::read_to_string( &path )
			.map_err(| cause | TranslateError::Unreadable { path: path.clone(), cause })?;
		let search_dirs = Self::default_search_dirs( &path );
		Ok( Self { path, text, search_dirs })
	}

	/// Writes `text` to a fresh file inside `dir` and snapshots it.
	///
	/// Used for compiling literal code that never lived in an editor: the
	/// caller picks (and creates) the directory, this picks a unique file
	/// name that is also a valid generated-class base name.
	///
	/// # Errors
	/// Returns the underlying io error if the file cannot be created or
	/// written.
	pub fn materialize( text: impl Into<String>, dir: &Path ) -> std::io::Result<Self> {
		let text = text.into();
		let mut file = tempfile::Builder::new()
			.prefix( "JvsSnippet" )
			.suffix( ".jvs" )
			.tempfile_in( dir )?;
		file.write_all( text.as_bytes() )?;
		let ( _, path ) = file.keep().map_err(| persist | persist.error )?;
		let search_dirs = Self::default_search_dirs( &path );
		Ok( Self { path, text, search_dirs })
	}

	/// Replaces the include-search path.
	pub fn with_search_dirs( mut self, search_dirs: NEVec<PathBuf> ) -> Self {
		self.search_dirs = search_dirs ;
		self
	}

	/// Where the unit was read from.
	#[inline] pub fn path( &self ) -> &Path { &self.path }

	/// The snapshotted pseudo-source text.
	#[inline] pub fn text( &self ) -> &str { &self.text }

	/// Directories searched, in order, when resolving includes.
	#[inline] pub fn search_dirs( &self ) -> &NEVec<PathBuf> { &self.search_dirs }

	/// The file name up to its first dot, used as the base of the
	/// generated class name.
	pub fn base_name( &self ) -> &str {
		self.path.file_name()
			.and_then(| name | name.to_str() )
			.and_then(| name | name.split( '.' ).next() )
			.unwrap_or( "JvsUnit" )
	}

	fn default_search_dirs( path: &Path ) -> NEVec<PathBuf> {
		let parent = match path.parent() {
			Some( dir ) if dir.as_os_str().is_empty() => PathBuf::from( "." ),
			Some( dir ) => dir.to_path_buf(),
			None => PathBuf::from( "." ),
		};
		let mut dirs = nev![ parent ];
		if let Some( home ) = home_dir() {
			dirs.push( home );
		}
		dirs.push( std::env::temp_dir() );
		dirs
	}

}

#[allow( deprecated )]
fn home_dir() -> Option<PathBuf> {
	std::env::home_dir()
}

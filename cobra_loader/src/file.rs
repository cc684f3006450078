use cobra_types::FileDescriptor;
use serde_derive::{Deserialize, Serialize};

/* ============================================================================
   Schema File
   ============================================================================ */

/* Hand-written or exported descriptor schema (YAML or JSON).
 *
 * A schema file lists one or more proto file descriptors and may import other
 * schema files by path. Imported descriptors are available for type and
 * import resolution but are not generation targets. */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SchemaFile {
    /* Other schema files, relative to this file or an include directory */
    #[serde(default)]
    pub imports: Vec<String>,

    /* Descriptors declared by this schema */
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
}

impl SchemaFile {
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /* Names of the proto files declared here */
    pub fn file_names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.name.clone()).collect()
    }
}

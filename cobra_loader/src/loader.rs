use cobra_types::FileDescriptor;
use prost::Message;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::descriptor::convert_file;
use crate::error::{LoadError, LoadResult};
use crate::file::SchemaFile;

/* Input formats recognised by file extension */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Yaml,
    Json,
    /* Binary `FileDescriptorSet`, as written by `protoc -o` */
    DescriptorSet,
}

impl SchemaFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Some(SchemaFormat::Yaml),
            Some("json") => Some(SchemaFormat::Json),
            Some("pb") | Some("desc") | Some("protoset") => Some(SchemaFormat::DescriptorSet),
            _ => None,
        }
    }
}

/* Loads schema inputs, following schema imports, and collects descriptors.
 *
 * Files named on the command line become generation targets; descriptors
 * reached only through imports are kept for resolution. */
pub struct SchemaLoader {
    /* Track loaded files to detect circular imports */
    loaded_files: HashSet<PathBuf>,

    /* Include directories for searching imports */
    include_dirs: Vec<PathBuf>,

    /* All collected descriptors, in load order */
    all_files: Vec<FileDescriptor>,

    /* Proto file names that should produce output */
    targets: Vec<String>,
}

impl SchemaLoader {
    pub fn new(include_dirs: Vec<PathBuf>) -> Self {
        Self {
            loaded_files: HashSet::new(),
            include_dirs,
            all_files: Vec::new(),
            targets: Vec::new(),
        }
    }

    /* Resolve an import path relative to a base file or include directories */
    fn resolve_import_path(&self, import_path: &str, base_file: &Path) -> LoadResult<PathBuf> {
        let candidates = base_file
            .parent()
            .map(|parent| parent.join(import_path))
            .into_iter()
            .chain(self.include_dirs.iter().map(|dir| dir.join(import_path)));

        for candidate in candidates {
            if candidate.exists() {
                return canonicalize(&candidate);
            }
        }

        Err(LoadError::ImportNotFound {
            import: import_path.to_string(),
            base: base_file.to_path_buf(),
        })
    }

    /* Load a schema file as a generation target, together with its imports */
    pub fn load_file(&mut self, file_path: &Path) -> LoadResult<()> {
        self.load_file_internal(file_path, true)
    }

    fn load_file_internal(&mut self, file_path: &Path, is_target: bool) -> LoadResult<()> {
        let canonical_path = canonicalize(file_path)?;

        if self.loaded_files.contains(&canonical_path) {
            debug!(path = %file_path.display(), "skipping already loaded schema");
            return Ok(());
        }

        /* Mark as loaded before processing imports to break import cycles */
        self.loaded_files.insert(canonical_path);

        let format = SchemaFormat::from_path(file_path)
            .ok_or_else(|| LoadError::UnsupportedFormat(file_path.to_path_buf()))?;
        info!(path = %file_path.display(), ?format, "loading schema");

        let schema = match format {
            SchemaFormat::Yaml => {
                let contents = read_to_string(file_path)?;
                serde_yml::from_str::<SchemaFile>(&contents).map_err(|source| LoadError::Yaml {
                    path: file_path.to_path_buf(),
                    source,
                })?
            }
            SchemaFormat::Json => {
                let contents = read_to_string(file_path)?;
                serde_json::from_str::<SchemaFile>(&contents).map_err(|source| LoadError::Json {
                    path: file_path.to_path_buf(),
                    source,
                })?
            }
            SchemaFormat::DescriptorSet => {
                let bytes = std::fs::read(file_path).map_err(|source| LoadError::Io {
                    path: file_path.to_path_buf(),
                    source,
                })?;
                decode_descriptor_set(&bytes)?
            }
        };

        for import in schema.imports() {
            debug!(import = %import, "resolving schema import");
            let import_path = self.resolve_import_path(import, file_path)?;
            self.load_file_internal(&import_path, false)?;
        }

        let names = match format {
            SchemaFormat::DescriptorSet => root_file_names(&schema),
            _ => schema.file_names(),
        };
        for descriptor in schema.files {
            self.add_descriptor(descriptor)?;
        }
        if is_target {
            for name in names {
                if !self.targets.contains(&name) {
                    self.targets.push(name);
                }
            }
        }

        Ok(())
    }

    /* Register a descriptor; identical re-declarations are ignored */
    pub fn add_descriptor(&mut self, descriptor: FileDescriptor) -> LoadResult<()> {
        if let Some(existing) = self.all_files.iter().find(|f| f.name == descriptor.name) {
            if *existing != descriptor {
                return Err(LoadError::ConflictingFile(descriptor.name));
            }
            return Ok(());
        }
        self.all_files.push(descriptor);
        Ok(())
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.all_files
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn loaded_file_count(&self) -> usize {
        self.loaded_files.len()
    }

    pub fn into_parts(self) -> (Vec<FileDescriptor>, Vec<String>) {
        (self.all_files, self.targets)
    }
}

/* Decode a binary `FileDescriptorSet` into a schema */
pub fn decode_descriptor_set(bytes: &[u8]) -> LoadResult<SchemaFile> {
    let set = prost_types::FileDescriptorSet::decode(bytes).map_err(|source| LoadError::Decode {
        what: "FileDescriptorSet",
        source,
    })?;
    Ok(SchemaFile {
        imports: Vec::new(),
        files: set.file.iter().map(convert_file).collect(),
    })
}

/* Files of a descriptor set that no other file in the set imports.
 *
 * `protoc --include_imports -o` writes dependencies alongside the requested
 * files; only the latter should produce output. */
pub fn root_file_names(schema: &SchemaFile) -> Vec<String> {
    let imported: HashSet<&str> = schema
        .files()
        .iter()
        .flat_map(|f| f.dependencies.iter().map(String::as_str))
        .collect();
    schema
        .files()
        .iter()
        .filter(|f| !imported.contains(f.name.as_str()))
        .map(|f| f.name.clone())
        .collect()
}

fn canonicalize(path: &Path) -> LoadResult<PathBuf> {
    path.canonicalize().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_to_string(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

//! Registry die bestandsformaten opzoekt op identifier.
//!
//! Er is precies één proceswijde tabel, opgebouwd bij het eerste gebruik;
//! verder bestaan er geen impliciete globals.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::convert::{self, ReadError, ReadResult};
use crate::scene::SceneDocument;

/// Beschrijvende tokens van een bestandsformaat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub id: &'static str,
    pub version: &'static str,
    pub target: &'static str,
    pub extension: &'static str,
}

/// Vaste descriptor van het MPCDI-formaat.
pub const MPCDI_FORMAT: FormatDescriptor = FormatDescriptor {
    id: "mpcdiFileFormat",
    version: "1.0",
    target: "scene",
    extension: "xml",
};

/// Trait die alle formaatimplementaties dienen te implementeren.
pub trait SceneFileFormat {
    /// Beschrijving van het formaat.
    fn descriptor(&self) -> FormatDescriptor;

    /// Snelle capaciteitscontrole op basis van het pad; mag vals-positief
    /// zijn.
    fn can_read(&self, path: &Path) -> bool;

    /// Leest `path` en draagt het resultaat in één keer over in `target`.
    /// Bij een fout blijft `target` onaangeroerd.
    fn read(&self, target: &mut SceneDocument, path: &Path) -> ReadResult<()>;

    /// Serialisatie terug naar het bronformaat; standaard niet ondersteund.
    fn write_to_string(&self, _document: &SceneDocument) -> ReadResult<String> {
        Err(ReadError::WriteUnsupported)
    }
}

/// Het MPCDI-bestandsformaat.
#[derive(Debug, Default, Clone, Copy)]
pub struct MpcdiFileFormat;

impl SceneFileFormat for MpcdiFileFormat {
    fn descriptor(&self) -> FormatDescriptor {
        MPCDI_FORMAT
    }

    fn can_read(&self, _path: &Path) -> bool {
        true
    }

    fn read(&self, target: &mut SceneDocument, path: &Path) -> ReadResult<()> {
        // Eerst volledig privé opbouwen; pas bij succes overdragen.
        let document = convert::read_file(path)?;
        target.transfer_content(document);
        Ok(())
    }
}

type FormatConstructor = fn() -> Box<dyn SceneFileFormat>;

/// Registry van formaatconstructors, opgezocht op formaat-id.
#[derive(Debug, Default)]
pub struct FormatRegistry {
    by_id: HashMap<&'static str, FormatConstructor>,
}

impl FormatRegistry {
    fn with_builtin_formats() -> Self {
        let mut registry = Self::default();
        registry.register(MPCDI_FORMAT.id, || Box::new(MpcdiFileFormat));
        registry
    }

    fn register(&mut self, id: &'static str, constructor: FormatConstructor) {
        self.by_id.insert(id, constructor);
    }

    /// Maakt een nieuwe formaatinstantie aan voor `id`.
    #[must_use]
    pub fn create(&self, id: &str) -> Option<Box<dyn SceneFileFormat>> {
        self.by_id.get(id).map(|constructor| constructor())
    }

    /// Geregistreerde formaat-ids, gesorteerd.
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Proceswijde registry; wordt bij het eerste gebruik opgebouwd.
    #[must_use]
    pub fn global() -> &'static FormatRegistry {
        static REGISTRY: OnceLock<FormatRegistry> = OnceLock::new();
        REGISTRY.get_or_init(FormatRegistry::with_builtin_formats)
    }
}

#[cfg(test)]
mod tests {
    use super::{FormatRegistry, MPCDI_FORMAT, MpcdiFileFormat, SceneFileFormat};
    use crate::convert::ReadError;
    use crate::scene::SceneDocument;
    use std::path::Path;

    #[test]
    fn global_registry_resolves_the_mpcdi_format() {
        let format = FormatRegistry::global()
            .create("mpcdiFileFormat")
            .expect("formaat geregistreerd");
        assert_eq!(format.descriptor(), MPCDI_FORMAT);
        assert!(format.can_read(Path::new("whatever.xml")));
    }

    #[test]
    fn unknown_ids_resolve_to_none() {
        assert!(FormatRegistry::global().create("onbekendFormaat").is_none());
    }

    #[test]
    fn registered_ids_are_listed() {
        assert_eq!(FormatRegistry::global().ids(), ["mpcdiFileFormat"]);
    }

    #[test]
    fn writing_is_always_unsupported() {
        let document = SceneDocument::new();
        let err = MpcdiFileFormat.write_to_string(&document).unwrap_err();
        assert!(matches!(err, ReadError::WriteUnsupported));
    }

    #[test]
    fn failed_reads_leave_the_target_untouched() {
        let mut target = SceneDocument::new();
        target
            .define_node(crate::scene::NodePath::root("bestaand"), crate::scene::NodeKind::Scope)
            .expect("node gedefinieerd");

        let err = MpcdiFileFormat
            .read(&mut target, Path::new("/nonexistent/file.xml"))
            .unwrap_err();
        assert!(matches!(err, ReadError::Io(_)));
        assert_eq!(target.node_count(), 1);
        assert!(target.node("/bestaand").is_some());
    }
}

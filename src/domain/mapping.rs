// Mapping from file names and entity rows to domain/API types.

use super::models::FileKind;

pub fn infer_file_kind_from_name(name: &str) -> FileKind {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        FileKind::Pdf
    } else {
        FileKind::Text
    }
}

/// Extension of an uploaded file name, lowercased, without the dot.
/// `None` when the name has no extension.
pub fn file_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_maps_to_pdf() {
        assert_eq!(infer_file_kind_from_name("story.pdf"), FileKind::Pdf);
        assert_eq!(infer_file_kind_from_name("STORY.PDF"), FileKind::Pdf);
    }

    #[test]
    fn everything_else_maps_to_text() {
        assert_eq!(infer_file_kind_from_name("notes.txt"), FileKind::Text);
        assert_eq!(infer_file_kind_from_name("no_extension"), FileKind::Text);
    }

    #[test]
    fn extension_extraction() {
        assert_eq!(file_extension("cover.PNG").as_deref(), Some("png"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension(".hidden"), None);
    }
}

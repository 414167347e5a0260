//! A version directory on disk served through the registry.

use std::fs;
use std::sync::Arc;

use lectio_adapters::{FilesystemAssetLoader, default_parsers};
use lectio_core::prelude::*;
use tempfile::TempDir;

const PSALM_USX: &str = r#"<usx version="3.0">
  <book code="PSA" style="id"/>
  <para style="h">Psalms</para>
  <chapter number="23" style="c" sid="PSA 23"/>
  <para style="q1"><verse number="1" style="v" sid="PSA 23:1"/>The LORD is my shepherd;</para>
  <para style="q2">I shall lack nothing.<verse eid="PSA 23:1"/></para>
  <para style="q1"><verse number="2" style="v" sid="PSA 23:2"/>He makes me lie down in green pastures.<verse eid="PSA 23:2"/></para>
  <chapter eid="PSA 23"/>
</usx>"#;

const JOHN_USFX: &str = r#"<usfx><book id="JHN"><h>John</h><c id="11"/><p><v id="35"/>Jesus wept.<ve/></p></book></usfx>"#;

fn id(s: &str) -> VersionId {
    VersionId::new(s).unwrap()
}

fn service_over(dir: &TempDir, format: Format, options: TextOptions) -> BibleService {
    let loader = FilesystemAssetLoader::new().with_version(id("web"), dir.path());
    let mut builder = BibleService::builder();
    for parser in default_parsers(options) {
        builder = builder.parser(parser);
    }
    builder
        .version(
            BibleVersion::new(id("web"), "World English Bible", "en", format),
            Arc::new(loader),
        )
        .build()
        .unwrap()
}

#[tokio::test]
async fn reads_usx_books_from_disk() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("PSA.usx"), PSALM_USX).unwrap();
    let service = service_over(&dir, Format::Usx, TextOptions::default());

    let verse = service.get_verse("Ps 23:1", None).await.unwrap();
    assert_eq!(verse.text, "The LORD is my shepherd; I shall lack nothing.");

    let passage = service.try_get_passage("Psalm 23:1-2", None).await.unwrap();
    assert_eq!(passage.verses.len(), 2);
}

#[tokio::test]
async fn line_breaks_survive_when_configured() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("PSA.usx"), PSALM_USX).unwrap();
    let options = TextOptions {
        preserve_line_breaks: true,
        ..TextOptions::default()
    };
    let service = service_over(&dir, Format::Usx, options);

    let verse = service.get_verse("Psalms 23:1", None).await.unwrap();
    assert_eq!(verse.text, "The LORD is my shepherd;\nI shall lack nothing.");
}

#[tokio::test]
async fn lists_books_in_canonical_order() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("JHN.xml"), JOHN_USFX).unwrap();
    fs::write(dir.path().join("GEN.xml"), JOHN_USFX).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    let service = service_over(&dir, Format::Usfx, TextOptions::default());

    let books: Vec<_> = service
        .available_books(None)
        .await
        .unwrap()
        .iter()
        .map(|code| code.to_string())
        .collect();
    assert_eq!(books, ["GEN", "JHN"]);
    assert!(service.has_book(&BookCode::new("JHN").unwrap(), None).await.unwrap());
}

#[tokio::test]
async fn usfx_search_across_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("JHN.usfx"), JOHN_USFX).unwrap();
    let service = service_over(&dir, Format::Usfx, TextOptions::default());

    let hits = service.search("wept", Some("John"), false).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].reference, "JHN 11:35");
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let service = service_over(&dir, Format::Usx, TextOptions::default());

    let err = service.try_get_passage("Gen 1:1", None).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(service.get_passage_by_reference("Gen 1:1", None).await.is_none());
}

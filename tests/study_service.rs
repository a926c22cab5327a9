//! End-to-end tests for the study endpoints over real dataset files

mod common;

use lumina_rs::LuminaError;
use lumina_rs::api::{CommentaryRequest, PassageRequest, Request, TextRequest, VerseRequest};
use lumina_rs::canon::VerseRef;
use lumina_rs::storage::Dataset;
use lumina_rs::{Config, StudyService};
use serde_json::json;

fn text_request(book: &str, chapter: u16, version: &str, interlinear: bool) -> TextRequest {
    TextRequest {
        book: book.to_string(),
        chapter,
        version: version.to_string(),
        interlinear,
    }
}

#[test]
fn test_text_chapter_with_modules() {
    let fixture = common::full();
    let service = fixture.service();

    let response = service.text(&text_request("Genesis", 1, "KJV", false)).unwrap();
    assert_eq!(response.verses.len(), 31);

    let first = &response.verses[0];
    assert_eq!(first.id, 1);
    assert_eq!(first.verse, 1);
    assert_eq!(first.modules.as_deref(), Some("mhc,jfb"));
    assert!(first.text.contains("<b>God</b>"));
    assert!(!first.text.contains("script"));

    assert_eq!(response.verses[1].modules, None);
    assert_eq!(response.verses[2].modules.as_deref(), Some("mhc"));
}

#[test]
fn test_text_interlinear() {
    let fixture = common::full();
    let service = fixture.service();

    let response = service.text(&text_request("Genesis", 1, "KJV", true)).unwrap();
    let first = &response.verses[0].text;
    assert!(first.starts_with(
        r#"In the beginning <span class="strongs-tag" data-strongs="H7225" data-lex-type="strong_hebrew">&lt;reshiyth&gt;</span>"#
    ));
    assert!(first.contains("&lt;elohiym&gt;"));
    assert!(first.contains("&lt;H1254&gt;</span> the heaven"));

    // Verses without tagged words keep their text
    assert_eq!(response.verses[1].text, "Genesis 1:2 plain text");
}

#[test]
fn test_text_from_versions_dataset() {
    let fixture = common::full();
    let service = fixture.service();

    let response = service.text(&text_request("John", 1, "ASV", false)).unwrap();
    assert_eq!(response.verses.len(), 4);
    assert_eq!(response.verses[3].text, "In him was life; and the life was the light of men.");
    assert!(response.verses.iter().all(|v| v.modules.is_none()));
}

#[test]
fn test_text_errors() {
    let fixture = common::full();
    let service = fixture.service();

    assert!(matches!(
        service.text(&text_request("Genesis", 51, "KJV", false)),
        Err(LuminaError::NotFound(_))
    ));
    assert!(matches!(
        service.text(&text_request("Hezekiah", 1, "KJV", false)),
        Err(LuminaError::UnknownBook(_))
    ));

    let body = service.respond_json(r#"{"action":"text","chapter":0}"#);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
}

#[test]
fn test_passage() {
    let fixture = common::full();
    let service = fixture.service();

    let range = service
        .passage(&PassageRequest {
            book: "Genesis".to_string(),
            chapter: 1,
            verse: 2,
            end_verse: Some(3),
            version: "KJV".to_string(),
        })
        .unwrap();
    assert_eq!(
        range.text,
        "<sup>2</sup> Genesis 1:2 plain text <sup>3</sup> Genesis 1:3 and there was light"
    );

    let single = service.respond_json(r#"{"action":"passage","book":"Genesis","chapter":1,"verse":2}"#);
    assert_eq!(single, json!({"text": "Genesis 1:2 plain text"}));

    let missing = service.respond_json(r#"{"action":"passage","book":"Genesis","chapter":1,"verse":40}"#);
    assert_eq!(missing, json!({"text": "Verse not found."}));
}

#[test]
fn test_commentary_decoded_and_fallback() {
    let fixture = common::full();
    let service = fixture.service();

    let request = |verse: u16, module: &str| CommentaryRequest {
        book: "Genesis".to_string(),
        chapter: 1,
        verse,
        module: Some(module.to_string()),
    };

    let text = service.commentary(&request(1, "MHC")).unwrap().text;
    assert!(text.starts_with("<b>In the beginning.</b> Compare <span class=\"ref-link\" data-book=\"Matthew\""));
    assert!(text.contains(">Matthew 1:1</span> and (<span"));
    assert!(text.contains(">Genesis 1:1</span>)"));
    assert!(text.contains(">Genesis 1:31</span>."));

    let jfb = service.commentary(&request(1, "jfb")).unwrap().text;
    assert_eq!(jfb, "The creation of all things.");

    let unresolved = service.commentary(&request(3, "mhc")).unwrap().text;
    assert_eq!(unresolved, "[FFFF] unresolvable");

    let fallback = service.commentary(&request(2, "mhc")).unwrap().text;
    assert_eq!(fallback, "No commentary found for this verse.");
    let unknown_module = service.commentary(&request(1, "barnes")).unwrap().text;
    assert_eq!(unknown_module, "No commentary found for this verse.");
}

#[test]
fn test_xrefs() {
    let fixture = common::full();
    let service = fixture.service();

    let response = service
        .xrefs(&VerseRequest {
            book: "Genesis".to_string(),
            chapter: 1,
            verse: 1,
        })
        .unwrap();
    assert_eq!(
        response.xrefs,
        vec![VerseRef::new("Matthew", 1, 1), VerseRef::new("Genesis", 1, 3)]
    );

    let none = service.respond_json(r#"{"action":"xrefs","book":"Genesis","chapter":1,"verse":2}"#);
    assert_eq!(none, json!({"xrefs": []}));
}

#[test]
fn test_definitions() {
    let fixture = common::full();
    let service = fixture.service();

    let hebrew = service.respond_json(r#"{"action":"definition","term":"H430","type":"strong_hebrew"}"#);
    assert_eq!(hebrew, json!({"definition": "God; see <b>gods</b>"}));

    let dictionary = service.respond_json(r#"{"action":"definition","term":"light","module":"easton"}"#);
    let definition = dictionary["definition"].as_str().unwrap();
    assert!(definition.starts_with("The first creation, cf. <span class=\"ref-link\""));
    assert!(definition.contains(">Genesis 1:3</span>"));

    let missing = service.respond_json(r#"{"action":"definition","term":"Zion"}"#);
    assert_eq!(missing, json!({"definition": "Not found."}));
}

#[test]
fn test_topics() {
    let fixture = common::full();
    let service = fixture.service();

    assert_eq!(
        service.respond_json(r#"{"action":"topics","module":"hebrew"}"#),
        json!({"topics": [{"id": "H430", "label": "H430"}, {"id": "H7225", "label": "H7225"}]})
    );
    assert_eq!(
        service.respond_json(r#"{"action":"topics","module":"GREEK"}"#),
        json!({"topics": [{"id": "G3056", "label": "G3056"}]})
    );
    assert_eq!(
        service.respond_json(r#"{"action":"topics"}"#),
        json!({"topics": [{"id": "Aaron", "label": "Aaron"}, {"id": "Light", "label": "Light"}]})
    );
    assert_eq!(
        service.respond_json(r#"{"action":"topics","module":"NAVE"}"#),
        json!({"topics": []})
    );
}

#[test]
fn test_version_and_commentary_lists() {
    let fixture = common::full();
    let service = fixture.service();

    assert_eq!(
        service.respond_json(r#"{"action":"version_list"}"#),
        json!({"versions": ["KJV", "ASV"]})
    );
    assert_eq!(
        service.respond_json(r#"{"action":"commentary_list"}"#),
        json!({"modules": ["JFB", "MHC"]})
    );
}

#[test]
fn test_commentary_list_fallback_for_empty_dataset() {
    let fixture = common::core_only();
    lumina_rs::storage::setup::create_dataset(fixture.dir.path(), Dataset::Commentaries).unwrap();
    let service = fixture.service();

    assert_eq!(
        service.respond_json(r#"{"action":"commentary_list"}"#),
        json!({"modules": ["MHC", "BARNES", "JFB", "ACC", "RWP"]})
    );
}

#[test]
fn test_missing_datasets_are_errors_not_empty_results() {
    let fixture = common::core_only();
    let service = fixture.service();

    let request = Request::Commentary(CommentaryRequest {
        book: "Genesis".to_string(),
        chapter: 1,
        verse: 1,
        module: None,
    });
    assert!(matches!(service.handle(&request), Err(LuminaError::DatasetUnavailable(_))));

    let body = service.respond_json(r#"{"action":"xrefs","book":"Genesis","chapter":1,"verse":1}"#);
    assert!(body["error"].as_str().unwrap().starts_with("Dataset unavailable"));

    // Text still renders without commentary availability
    let text = service.text(&text_request("Genesis", 1, "KJV", true)).unwrap();
    assert!(text.verses.iter().all(|v| v.modules.is_none()));
    assert_eq!(
        service.respond_json(r#"{"action":"version_list"}"#),
        json!({"versions": ["KJV"]})
    );
}

#[test]
fn test_late_installed_dataset_attaches_on_use() {
    let fixture = common::core_only();
    let service = fixture.service();
    assert!(!service.federation().is_attached(Dataset::Commentaries));

    lumina_rs::storage::setup::create_dataset(fixture.dir.path(), Dataset::Commentaries).unwrap();
    let body = service.respond_json(r#"{"action":"commentary_list"}"#);
    assert_eq!(body["modules"].as_array().unwrap().len(), 5);
    assert!(service.federation().is_attached(Dataset::Commentaries));
}

#[test]
fn test_missing_core_fails_to_open() {
    let fixture = common::full();
    fixture.remove(Dataset::Core);
    let config = Config::with_data_dir(fixture.dir.path());
    assert!(matches!(
        StudyService::open(config),
        Err(LuminaError::DatasetUnavailable(_))
    ));
}

#[test]
fn test_configured_default_modules_apply_to_json_requests() {
    let fixture = common::full();
    let mut config = Config::with_data_dir(fixture.dir.path());
    config.study.default_commentary = "jfb".to_string();
    config.study.default_dictionary = "smith".to_string();
    let service = StudyService::open(config).unwrap();

    assert_eq!(
        service.respond_json(r#"{"action":"commentary","book":"Genesis","chapter":1,"verse":1}"#),
        json!({"text": "The creation of all things."})
    );
    assert_eq!(
        service.respond_json(r#"{"action":"definition","term":"abba"}"#),
        json!({"definition": "Father."})
    );
    assert_eq!(
        service.respond_json(r#"{"action":"topics"}"#),
        json!({"topics": [{"id": "Abba", "label": "Abba"}]})
    );

    // An explicit module still wins
    let explicit = service.respond_json(r#"{"action":"definition","term":"light","module":"EASTON"}"#);
    assert!(explicit["definition"].as_str().unwrap().starts_with("The first creation"));
}

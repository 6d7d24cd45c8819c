//! End-to-end tests of the generation pipeline

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use pkgforge::{
    parse_fields, ArtifactKind, FieldSpecError, FixedFilePolicy, GenerateError, Generator, Model,
    ModelError, RenderError, TemplateRegistry,
};
use tempfile::TempDir;

fn collaborators() -> BTreeMap<String, String> {
    [
        ("configuration", "github.com/acme/shop/configuration"),
        ("logger", "github.com/acme/shop/logger"),
        ("message_catalog", "github.com/acme/shop/message"),
        ("module_role", "github.com/acme/shop/authorization"),
        ("login", "github.com/acme/shop/authorization"),
        ("sql_utilities", "github.com/acme/shop/psql"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn model(name: &str, table: &str, spec: &str) -> Model {
    Model::new(name, table, parse_fields(spec).unwrap(), collaborators()).unwrap()
}

fn generator() -> Generator<'static> {
    Generator::new(TemplateRegistry::global().unwrap())
}

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 17)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

/// Column names between the `id` column and the bookkeeping timestamps
fn field_columns(sql: &str) -> Vec<String> {
    sql.lines()
        .map(str::trim)
        .skip_while(|line| !line.starts_with("id SERIAL"))
        .skip(1)
        .take_while(|line| !line.starts_with("created_at"))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

#[test]
fn test_books_scenario_produces_all_artifacts() {
    let dir = TempDir::new().unwrap();
    let model = model("book", "books", "title:string:f:100 published:bool");

    let report = generator().generate_at(&model, dir.path(), fixed_time()).unwrap();

    assert!(report.is_complete());
    let kinds: Vec<ArtifactKind> = report.produced.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, ArtifactKind::ORDERED.to_vec());

    let sql = read(dir.path(), "database/20240517_093000_create_books.sql");
    let title = sql.find("title VARCHAR(100) NOT NULL").unwrap();
    let published = sql.find("published BOOLEAN NOT NULL").unwrap();
    assert!(title < published);

    for file in ["model.go", "storage.go", "psql.go", "handler.go", "route.go"] {
        let content = read(dir.path(), &format!("models/book/{file}"));
        assert!(content.starts_with("package book"), "{file} has wrong package");
    }
}

#[test]
fn test_column_parity_and_order() {
    let model = model(
        "author",
        "authors",
        "name:string:f:80 born:timestamp:t rating:float32 books:uint:t alive:bool",
    );
    let sql = generator().render(ArtifactKind::Sql, &model).unwrap();

    let expected: Vec<String> = model.fields().iter().map(|f| f.name.clone()).collect();
    assert_eq!(field_columns(&sql), expected);
}

#[test]
fn test_naming_is_consistent_across_artifacts() {
    let dir = TempDir::new().unwrap();
    let model = model("book_author", "book_authors", "published_at:timestamp:t pen_name:string");

    generator().generate_at(&model, dir.path(), fixed_time()).unwrap();

    let sql = read(dir.path(), "database/20240517_093000_create_book_authors.sql");
    let model_go = read(dir.path(), "models/book_author/model.go");
    let psql_go = read(dir.path(), "models/book_author/psql.go");
    let route_go = read(dir.path(), "models/book_author/route.go");

    assert!(sql.contains("published_at TIMESTAMP,"));
    assert!(sql.contains("pen_name VARCHAR NOT NULL,"));

    assert!(model_go.contains("PublishedAt time.Time `json:\"publishedAt\"`"));
    assert!(model_go.contains("PenName string `json:\"penName\"`"));

    assert!(psql_go.contains("INSERT INTO book_authors (published_at, pen_name, created_at, updated_at)"));
    assert!(psql_go.contains("psql.TimeToNull(m.PublishedAt)"));
    assert!(psql_go.contains("nullPublishedAt := pq.NullTime{}"));
    assert!(psql_go.contains("m.PublishedAt = nullPublishedAt.Time"));
    assert!(psql_go.contains("&m.PenName"));
    assert!(psql_go.contains("\"github.com/lib/pq\""));

    assert!(route_go.contains("/api/v1/book-authors"));
    assert!(route_go.contains("const ModuleName = \"BOOK_AUTHOR\""));
}

#[test]
fn test_shared_collaborator_is_imported_once() {
    let model = model("book", "books", "title:string");
    let route = generator().render(ArtifactKind::Route, &model).unwrap();

    assert_eq!(route.matches("\"github.com/acme/shop/authorization\"").count(), 1);
    assert!(route.contains("authorization.ValidateJWT, authorization.Permission(ModuleName)"));
    assert!(route.contains("configuration.Get()"));
}

#[test]
fn test_update_placeholders_follow_field_count() {
    let model = model("book", "books", "title:string pages:int:t isbn:string:f:13");
    let psql = generator().render(ArtifactKind::Persistence, &model).unwrap();

    assert!(psql.contains("SET title = $1, pages = $2, isbn = $3, updated_at = now() WHERE id = $4"));
    assert!(psql.contains("psql.IntToNull(int64(m.Pages))"));
    assert!(psql.contains("m.Pages = int(nullPages.Int64)"));
    assert!(!psql.contains("github.com/lib/pq"));
}

#[test]
fn test_generation_is_deterministic() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let model = model("book", "books", "title:string:f:100 price:float64:t published:bool");

    let a = generator().generate_at(&model, first.path(), fixed_time()).unwrap();
    let b = generator().generate(&model, second.path()).unwrap();

    for kind in ArtifactKind::ORDERED.into_iter().filter(|k| k.is_source()) {
        let left = a.file(kind).unwrap();
        let right = b.file(kind).unwrap();
        assert_eq!(left.content, right.content, "{kind} differs");
        assert_eq!(
            fs::read(&left.path).unwrap(),
            fs::read(&right.path).unwrap(),
            "{kind} differs on disk"
        );
    }
}

#[test]
fn test_second_run_refuses_existing_sources() {
    let dir = TempDir::new().unwrap();
    let model = model("book", "books", "title:string");
    let generator = generator();

    generator.generate_at(&model, dir.path(), fixed_time()).unwrap();
    let err = generator
        .generate_at(&model, dir.path(), fixed_time())
        .unwrap_err();

    match err {
        GenerateError::AlreadyExists { path } => assert!(path.ends_with("models/book/model.go")),
        other => panic!("unexpected error: {other}"),
    }

    // The refused run leaves the database folder untouched.
    let sql = read(dir.path(), "database/20240517_093000_create_books.sql");
    assert_eq!(sql.matches("CREATE TABLE books").count(), 1);

    let later = fixed_time() + chrono::Duration::seconds(30);
    generator.generate_at(&model, dir.path(), later).unwrap_err();
    let migrations = fs::read_dir(dir.path().join("database")).unwrap().count();
    assert_eq!(migrations, 1);
}

#[test]
fn test_append_policy_concatenates_renderings() {
    let dir = TempDir::new().unwrap();
    let model = model("book", "books", "title:string");
    let generator = generator().fixed_file_policy(FixedFilePolicy::Append);

    let first = generator.generate_at(&model, dir.path(), fixed_time()).unwrap();
    generator.generate_at(&model, dir.path(), fixed_time()).unwrap();

    let once = &first.file(ArtifactKind::Model).unwrap().content;
    let model_go = read(dir.path(), "models/book/model.go");
    assert_eq!(model_go, format!("{once}{once}"));
    assert_eq!(model_go.matches("package book").count(), 2);
}

#[test]
fn test_migrations_in_different_seconds_are_separate_files() {
    let dir = TempDir::new().unwrap();
    let model = model("book", "books", "title:string");
    let generator = generator().fixed_file_policy(FixedFilePolicy::Append);
    let later = fixed_time() + chrono::Duration::seconds(1);

    generator.generate_at(&model, dir.path(), fixed_time()).unwrap();
    generator.generate_at(&model, dir.path(), later).unwrap();

    let migrations = fs::read_dir(dir.path().join("database")).unwrap().count();
    assert_eq!(migrations, 2);
}

#[test]
fn test_unsupported_type_skips_typed_artifacts() {
    let dir = TempDir::new().unwrap();
    let model = model("book", "books", "title:string price:decimal");

    let report = generator().generate_at(&model, dir.path(), fixed_time()).unwrap();

    let skipped: Vec<ArtifactKind> = report.skipped.iter().map(|s| s.kind).collect();
    assert_eq!(
        skipped,
        vec![ArtifactKind::Sql, ArtifactKind::Model, ArtifactKind::Persistence]
    );
    for skip in &report.skipped {
        assert!(matches!(
            &skip.error,
            RenderError::UnsupportedType { field, ty } if field == "price" && ty == "decimal"
        ));
    }

    let produced: Vec<ArtifactKind> = report.produced.iter().map(|f| f.kind).collect();
    assert_eq!(
        produced,
        vec![ArtifactKind::Storage, ArtifactKind::Handler, ArtifactKind::Route]
    );
    assert!(!dir.path().join("models/book/psql.go").exists());
    assert!(dir.path().join("models/book/route.go").is_file());
}

#[test]
fn test_custom_template_directory() {
    let templates = TempDir::new().unwrap();
    for kind in ArtifactKind::ORDERED {
        fs::write(
            templates.path().join(format!("{}.hbs", kind.template_name())),
            "-- {{table}}{{#each fields}} {{ucc name}}{{/each}}\n",
        )
        .unwrap();
    }
    let registry = TemplateRegistry::from_dir(templates.path()).unwrap();
    let model = model("book", "books", "title:string page_count:int");

    let out = Generator::new(&registry).render(ArtifactKind::Handler, &model).unwrap();
    assert_eq!(out, "-- books Title PageCount\n");
}

#[test]
fn test_zero_fields_are_rejected() {
    assert_eq!(parse_fields("   "), Err(FieldSpecError::Empty));
    assert_eq!(
        Model::new("book", "books", Vec::new(), BTreeMap::new()),
        Err(ModelError::NoFields("book".to_string()))
    );
}

#[test]
fn test_names_that_would_break_generated_code_are_refused() {
    let fields = |spec| parse_fields(spec).unwrap();

    for spec in ["title:string id:int", "title:string created_at:timestamp", "updated_at:timestamp"] {
        assert!(matches!(
            Model::new("book", "books", fields(spec), collaborators()),
            Err(ModelError::ReservedField(_))
        ));
    }
    assert!(matches!(
        Model::new("book", "books", fields("foo_bar:int foo__bar:int"), collaborators()),
        Err(ModelError::CollidingFields { .. })
    ));
    for spec in ["order:int", "group:string", "user:string"] {
        assert!(matches!(
            Model::new("book", "books", fields(spec), collaborators()),
            Err(ModelError::ReservedWord { role: "field", .. })
        ));
    }
}

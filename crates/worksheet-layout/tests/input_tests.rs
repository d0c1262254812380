use tempfile::TempDir;
use worksheet_layout::*;

#[tokio::test]
async fn test_load_problems_from_csv() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("problems.csv");
    tokio::fs::write(&path, "problem,answer\n\"3/4 + 1/2 =\",5/4\nx^2 = 9,3\n\n")
        .await
        .unwrap();

    let problems = load_problems(&path).await.unwrap();
    assert_eq!(problems, vec!["3/4 + 1/2 =", "x^2 = 9"]);
}

#[tokio::test]
async fn test_load_problems_from_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("problems.txt");
    tokio::fs::write(&path, "12 + 7 =\n\n  6 * 4 =  \n").await.unwrap();

    let problems = load_problems(&path).await.unwrap();
    assert_eq!(problems, vec!["12 + 7 =", "6 * 4 ="]);
}

#[tokio::test]
async fn test_worksheet_spec_defaults_student_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("spec.json");
    tokio::fs::write(
        &path,
        r#"{"level": "C", "topic": "Addition", "problems": ["1 + 1 ="]}"#,
    )
    .await
    .unwrap();

    let spec = WorksheetSpec::load(&path).await.unwrap();
    assert_eq!(spec.level, "C");
    assert_eq!(spec.student_fields, vec!["Time", "Date", "Name"]);
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = WorksheetSpec::load(dir.path().join("nope.json")).await;
    assert!(matches!(result, Err(LayoutError::Io(_))));
}

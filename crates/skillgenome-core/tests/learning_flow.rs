//! End-to-end learning flow: generation output -> graph -> quizzes ->
//! completion -> snapshot -> restore.

use skillgenome_core::payload::parse_generation_text;
use skillgenome_core::quiz::parse_quiz_payload;
use skillgenome_core::{EngineState, LearningSession, SkillGraph};
use skillgenome_types::config::GenomeConfig;
use skillgenome_types::skill::SkillView;

const GENERATED: &str = r#"```json
{
  "nodes": [
    {"id": "Python Basics", "desc": "Syntax and data types", "resources": ["https://docs.python.org/3/tutorial/"]},
    {"id": "SQL", "desc": "Querying relational data"},
    {"id": "Pandas", "desc": "Dataframes"},
    {"id": "ETL Pipelines", "desc": "Moving data reliably"},
    {"id": "Git"}
  ],
  "edges": [
    {"source": "Python Basics", "target": "Pandas", "reason": "Pandas is a Python library"},
    {"source": "Pandas", "target": "ETL Pipelines", "reason": "Transform step"},
    {"source": "SQL", "target": "ETL Pipelines", "reason": "Load step"}
  ]
}
```"#;

fn quiz() -> serde_json::Value {
    serde_json::json!([
        {"question": "Q1", "options": ["a", "b"], "correct_answer": "a"},
        {"question": "Q2", "options": ["a", "b"], "correct_answer": "b"},
        {"question": "Q3", "options": ["a", "b"], "correct_answer": "a"}
    ])
}

fn answers(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_full_learning_flow() {
    let mut session = LearningSession::new("Data Engineer", GenomeConfig::default());
    session
        .regenerate(parse_generation_text(GENERATED).unwrap())
        .unwrap();

    let graph = session.graph();
    assert_eq!(graph.state(), EngineState::Built);
    assert_eq!(graph.len(), 5);
    assert_eq!(
        graph.get_critical_path(),
        vec!["Python Basics", "Pandas", "ETL Pipelines"]
    );
    assert_eq!(graph.frontier(), vec!["Git", "Python Basics", "SQL"]);
    assert_eq!(graph.view("ETL Pipelines").unwrap(), SkillView::Blocked);

    // A failed attempt keeps the skill pending.
    let questions = parse_quiz_payload(quiz()).unwrap();
    session.start_quiz("Python Basics", questions.clone()).unwrap();
    let eval = session.submit_answers(&answers(&["a", "a", "a"])).unwrap();
    assert!(!eval.passed);
    assert_eq!(eval.score, 2);

    // The retry passes and unlocks Pandas.
    let eval = session.submit_answers(&answers(&["a", "b", "a"])).unwrap();
    assert!(eval.passed);
    assert_eq!(
        session.graph().view("Pandas").unwrap(),
        SkillView::Current
    );

    // ETL is still blocked by SQL and Pandas.
    let err = session.start_quiz("ETL Pipelines", questions.clone()).unwrap_err();
    assert_eq!(err.kind(), "blocked");

    for skill in ["SQL", "Pandas"] {
        session.start_quiz(skill, questions.clone()).unwrap();
        assert!(session.submit_answers(&answers(&["a", "b", "a"])).unwrap().passed);
    }
    assert!(session.graph().get_blockers("ETL Pipelines").is_empty());

    // Persist and restore.
    let blob = session.graph().serialize().unwrap();
    let restored = SkillGraph::deserialize(&blob).unwrap();
    assert_eq!(restored.progress(), session.graph().progress());
    assert_eq!(restored.progress().completed, 3);
    assert_eq!(restored.frontier(), vec!["Git", "ETL Pipelines"]);

    let record = session.record();
    let json = serde_json::to_string(&record).unwrap();
    let back = LearningSession::restore(serde_json::from_str(&json).unwrap(), GenomeConfig::default())
        .unwrap();
    assert_eq!(back.role(), "Data Engineer");
    assert_eq!(back.graph().len(), 5);
}

#[test]
fn test_cyclic_generation_leaves_engine_empty() {
    let text = r#"{
        "nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
        "edges": [
            {"source": "A", "target": "B"},
            {"source": "B", "target": "C"},
            {"source": "C", "target": "A"}
        ]
    }"#;
    let mut graph = SkillGraph::new();
    let err = graph
        .build_from_graph_description(parse_generation_text(text).unwrap())
        .unwrap_err();
    assert_eq!(err.kind(), "build");
    assert_eq!(graph.state(), EngineState::Empty);
    assert!(graph.get_critical_path().is_empty());
}

#[test]
fn test_upstream_error_payload_is_surfaced() {
    let text = r#"{"error": "Failed to parse JSON", "raw": "I cannot help with that"}"#;
    let mut graph = SkillGraph::new();
    let err = graph
        .build_from_graph_description(parse_generation_text(text).unwrap())
        .unwrap_err();
    assert_eq!(err.kind(), "upstream_generation");
    assert_eq!(err.raw(), Some("I cannot help with that"));
    assert!(graph.is_empty());
}

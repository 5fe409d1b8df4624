use creditshift::api_json::*;
use creditshift::error::{ConfigError, EngineError, PlanDecodeError};
use creditshift::models::{CourseStatus, Plan, RegisteredCreditCounts};
use serde_json::json;

fn job_json(plan: serde_json::Value) -> String {
    json!({
        "requirementTree": {
            "id": "degree",
            "name": "Degree",
            "children": [
                {"id": "math", "name": "Math", "courses": ["MAT101", "MAT102"], "creditCount": {"min": 6, "max": 12}},
                {"id": "free", "name": "Free", "courses": [], "creditCount": 4, "allowsOthers": true},
                {"id": "track", "name": "track", "options": [
                    {"name": "sw", "requirement": {"id": "sw", "name": "Software", "courses": ["INF200"], "creditCount": 4}}
                ]}
            ]
        },
        "plan": plan,
        "courseCatalogue": [
            {"code": "MAT101", "title": "Calculus I", "creditCount": 6},
            {"code": "MAT102", "title": "Calculus II", "creditCount": 6},
            {"code": "INF200", "title": "Software Engineering", "creditCount": 4}
        ],
        "fixedSelections": {"track": "sw"},
        "options": {"fillUnsatisfiableLeaves": false}
    })
    .to_string()
}

#[test]
fn test_parse_job_with_every_field() {
    let job = parse_search_job(&job_json(json!({
        "courseToStatus": {"MAT101": "acquired", "INF200": "registered"},
        "courseToRequirement": {"MAT101": "math"},
        "requirementToOthersCount": {"free": {"acquired": 2, "registered": 4}},
        "selectionNameToOptionName": {"track": "sw"}
    })))
    .expect("job should parse");

    assert_eq!(job.plan.status_of("MAT101"), CourseStatus::Acquired);
    assert_eq!(job.plan.others_count("free"), RegisteredCreditCounts::new(2, 4));
    assert_eq!(job.fixed_selections.as_ref().and_then(|s| s.get("track")).map(String::as_str), Some("sw"));
    assert!(!job.options.fill_unsatisfiable_leaves);
    assert_eq!(job.tree.all_leaves().len(), 3);
}

#[test]
fn test_plan_round_trip_is_byte_identical() {
    let job = parse_search_job(&job_json(json!({}))).unwrap();
    let plan = Plan::new()
        .with_status("MAT102", CourseStatus::Registered)
        .with_status("MAT101", CourseStatus::Acquired)
        .with_assignment("MAT102", "math")
        .with_others_count("free", RegisteredCreditCounts::new(1, 3))
        .with_selection("track", "sw");

    let first = serde_json::to_string(&plan).unwrap();
    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    let decoded = decode_plan(&value, &job.tree, &job.catalogue).unwrap();
    let second = serde_json::to_string(&decoded).unwrap();
    assert_eq!(first, second);
    assert_eq!(decoded, plan);
}

#[test]
fn test_tree_errors_are_config_errors() {
    let body = json!({
        "requirementTree": {"id": "degree", "name": "Degree", "children": [
            {"id": "a", "name": "A", "courses": [], "creditCount": 0},
            {"id": "a", "name": "A again", "courses": [], "creditCount": 0}
        ]},
        "courseCatalogue": []
    });
    match parse_search_job(&body.to_string()) {
        Err(EngineError::Config(ConfigError::DuplicateRequirementId { id })) => assert_eq!(id, "a"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_plan_errors_are_plan_decode_errors() {
    let result = parse_search_job(&job_json(json!({"courseToRequirement": {"MAT101": "track"}})));
    assert!(matches!(
        result,
        Err(EngineError::PlanDecode(PlanDecodeError::NotACourseRequirement { .. }))
    ));
    let result = parse_search_job(&job_json(json!({"courseToRequirement": {"MAT101": "nowhere"}})));
    assert!(matches!(
        result,
        Err(EngineError::PlanDecode(PlanDecodeError::UnknownRequirement { .. }))
    ));
}

#[test]
fn test_invalid_json_is_reported() {
    assert!(matches!(parse_search_job("{not json"), Err(EngineError::Json(_))));
    let missing_tree = json!({"courseCatalogue": []}).to_string();
    assert!(matches!(parse_search_job(&missing_tree), Err(EngineError::Json(_))));
}

#[test]
fn test_encoded_tree_decodes_to_same_shape() {
    let job = parse_search_job(&job_json(json!({}))).unwrap();
    let encoded = encode_requirement_tree(&job.tree);
    assert_eq!(encoded["children"][1]["creditCount"], json!(4));
    assert_eq!(encoded["children"][1]["allowsOthers"], json!(true));
    assert_eq!(encoded["children"][2]["options"][0]["name"], json!("sw"));
    let again = decode_requirement_tree(&encoded, &job.catalogue).unwrap();
    assert_eq!(encode_requirement_tree(&again), encoded);
}

#[test]
fn test_status_request_reports_every_node() {
    let request: StatusRequest = serde_json::from_str(&job_json(json!({
        "courseToStatus": {"MAT101": "acquired"},
        "courseToRequirement": {"MAT101": "math"}
    })))
    .unwrap();
    let (tree, plan) = decode_status_request(request).unwrap();
    let report = serde_json::to_value(tree.status_report(&plan)).unwrap();
    assert_eq!(report["id"], "degree");
    assert_eq!(report["children"][0]["status"], "acquired");
    assert_eq!(report["children"][0]["credits"], json!({"acquired": 6, "registered": 6}));
    assert_eq!(report["children"][2]["activeOption"], "sw");
}

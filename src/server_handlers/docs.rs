use actix_web::{HttpResponse, Responder};
use serde_json::json;

pub async fn help_handler() -> impl Responder {
    let example = json!({
        "requirementTree": {
            "id": "degree",
            "name": "Computer Science",
            "children": [
                {"id": "math", "name": "Mathematics", "courses": ["MAT101", "MAT102"], "creditCount": {"min": 6, "max": 12}},
                {"id": "track", "name": "track", "options": [
                    {"name": "software", "requirement": {"id": "sw", "name": "Software", "courses": ["INF200"], "creditCount": 4}},
                    {"name": "free", "requirement": {"id": "free", "name": "Free electives", "courses": [], "creditCount": 4, "allowsOthers": true}}
                ]}
            ]
        },
        "plan": {
            "courseToStatus": {"MAT101": "acquired", "MAT102": "registered", "INF200": "registered"},
            "requirementToOthersCount": {"free": {"acquired": 2, "registered": 4}}
        },
        "courseCatalogue": [
            {"code": "MAT101", "title": "Calculus I", "creditCount": 6},
            {"code": "MAT102", "title": "Calculus II", "creditCount": 6},
            {"code": "INF200", "title": "Software Engineering", "creditCount": 4}
        ],
        "options": {"fillUnsatisfiableLeaves": false}
    });

    let help = json!({
        "description": "Automatic course assignment. Given a requirement tree, a catalogue and the student's plan, finds the assignments of courses to requirements that maximize acquired and registered credits.",
        "endpoints": {
            "POST /assignments/search": "streams NDJSON lines {\"type\":\"batch\",\"plans\":[...]} as better plans are found, then {\"type\":\"done\"}",
            "POST /assignments/best": "waits for the search and returns {plans, batches, plansExamined, configurations}",
            "POST /requirements/status": "body {requirementTree, plan, courseCatalogue}; returns the status of every requirement",
            "GET /help": "this document"
        },
        "post_example": example,
        "note": "fixedSelections (selection name -> option name) pins electives; when absent the plan's selectionNameToOptionName is pinned. options.fillUnsatisfiableLeaves defaults to false; set it to true to keep plans whose unreachable leaves only receive leftover courses."
    });

    HttpResponse::Ok().json(help)
}

mod common;

use common::*;
use emotispace::prompt::FEATURE_CONSTRAINT_HEADER;
use emotispace::{
    AspectRatio, BackendError, Budget, ConceptOptions, DesignOptions, Mood, Orchestrator,
    Personality, Room, RunRequest, RunResult, RunStatus, Stage, Style,
};
use tokio::sync::broadcast;
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn interior_request(features: &str) -> RunRequest {
    RunRequest::Interior(DesignOptions {
        personality: Personality::Introvert,
        mood: Mood::Calm,
        room: Room::Bedroom,
        style: Style::Modern,
        budget: Budget::MidRange,
        features: features.to_string(),
    })
}

fn architecture_request() -> RunRequest {
    RunRequest::Architecture(ConceptOptions::new(
        "Serenity",
        "Hyderabad, Telangana, India",
    ))
}

fn drain(rx: &mut broadcast::Receiver<RunStatus>) -> Vec<RunStatus> {
    let mut statuses = Vec::new();
    while let Ok(status) = rx.try_recv() {
        statuses.push(status);
    }
    statuses
}

async fn server_with_report(report: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    mount_text(
        &server,
        ResponseTemplate::new(200).set_body_json(text_envelope(&report.to_string())),
        1,
    )
    .await;
    server
}

#[test_log::test(tokio::test)]
async fn interior_run_makes_one_text_call_then_one_widescreen_image() {
    let server = server_with_report(design_report_json()).await;
    mount_image(&server, ResponseTemplate::new(200).set_body_json(image_envelope()), 1).await;

    let orchestrator = Orchestrator::from_config(config_for(&server));
    let result = orchestrator.run(interior_request("")).await.unwrap();

    let RunResult::Interior(result) = result else {
        panic!("expected an interior result");
    };
    let steps = result.report.implementation_steps.len();
    assert!((3..=6).contains(&steps), "{} steps", steps);
    assert_eq!(result.image.aspect_ratio, AspectRatio::Widescreen);
    assert_eq!(result.image.bytes, PNG_SIGNATURE);

    let calls = received(&server).await;
    assert_eq!(calls.len(), 2);
    assert!(calls[0].0.ends_with(":generateContent"));
    let instruction = calls[0].1["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap();
    assert!(!instruction.contains(FEATURE_CONSTRAINT_HEADER));
    for value in ["Introvert", "Calm", "Bedroom", "Modern", "Mid-Range"] {
        assert!(instruction.contains(value));
    }

    assert!(calls[1].0.ends_with(":predict"));
    assert_eq!(calls[1].1["parameters"]["aspectRatio"], "16:9");
    assert_eq!(
        calls[1].1["instances"][0]["prompt"],
        design_report_json()["visual_prompt"]
    );
}

#[tokio::test]
async fn interior_features_reach_the_text_call() {
    let server = server_with_report(design_report_json()).await;
    mount_image(&server, ResponseTemplate::new(200).set_body_json(image_envelope()), 1).await;

    let orchestrator = Orchestrator::from_config(config_for(&server));
    orchestrator
        .run(interior_request("north-facing bay window, 3.5m x 4m"))
        .await
        .unwrap();

    let calls = received(&server).await;
    let instruction = calls[0].1["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap();
    assert!(instruction.contains(FEATURE_CONSTRAINT_HEADER));
    assert!(instruction.contains("north-facing bay window, 3.5m x 4m"));
}

#[test_log::test(tokio::test)]
async fn architecture_run_renders_exterior_before_floor_plan() {
    let server = server_with_report(architectural_brief_json()).await;
    mount_image(&server, ResponseTemplate::new(200).set_body_json(image_envelope()), 2).await;

    let orchestrator = Orchestrator::from_config(config_for(&server));
    let result = orchestrator.run(architecture_request()).await.unwrap();

    let RunResult::Architecture(result) = result else {
        panic!("expected an architecture result");
    };
    assert_eq!(result.brief.key_features.len(), 3);
    assert_eq!(result.exterior.aspect_ratio, AspectRatio::Widescreen);
    assert_eq!(result.floor_plan.aspect_ratio, AspectRatio::Square);

    let calls = received(&server).await;
    let paths: Vec<&str> = calls.iter().map(|(path, _)| path.as_str()).collect();
    assert_eq!(paths.len(), 3);
    assert!(paths[0].ends_with(":generateContent"));
    assert!(paths[1].ends_with(":predict"));
    assert!(paths[2].ends_with(":predict"));

    let brief = architectural_brief_json();
    assert_eq!(calls[1].1["parameters"]["aspectRatio"], "16:9");
    assert_eq!(calls[1].1["instances"][0]["prompt"], brief["visual_prompt"]);
    assert_eq!(calls[2].1["parameters"]["aspectRatio"], "1:1");
    assert_eq!(calls[2].1["instances"][0]["prompt"], brief["floor_plan_prompt"]);

    let instruction = calls[0].1["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap();
    assert!(instruction.contains("Serenity"));
    assert!(instruction.contains("Hyderabad, Telangana, India"));
}

#[tokio::test]
async fn image_failure_after_report_discards_the_report() {
    let server = server_with_report(design_report_json()).await;
    mount_image(&server, ResponseTemplate::new(500).set_body_string("internal"), 1).await;

    let orchestrator = Orchestrator::from_config(config_for(&server));
    let failure = orchestrator.run(interior_request("")).await.unwrap_err();

    assert_eq!(failure.stage, Stage::ImagePending);
    assert_eq!(failure.user_message(), "Failed to generate image.");
    assert!(matches!(
        failure.failure.cause(),
        BackendError::Status { status: 500, .. }
    ));
}

#[tokio::test]
async fn floor_plan_failure_fails_the_whole_architecture_run() {
    let server = server_with_report(architectural_brief_json()).await;
    // The exterior succeeds once, then the floor plan gets an empty result.
    Mock::given(method("POST"))
        .and(path_regex(r":predict$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_envelope()))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_image(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"predictions": []})),
        1,
    )
    .await;

    let orchestrator = Orchestrator::from_config(config_for(&server));
    let failure = orchestrator.run(architecture_request()).await.unwrap_err();

    assert_eq!(failure.user_message(), "Failed to generate image.");
    assert!(matches!(failure.failure.cause(), BackendError::EmptyResponse));
    assert_eq!(received(&server).await.len(), 3);
}

#[tokio::test]
async fn text_failure_stops_before_any_image_call() {
    let server = MockServer::start().await;
    mount_text(
        &server,
        ResponseTemplate::new(200).set_body_json(text_envelope("{\"conceptual_headline\": ")),
        1,
    )
    .await;
    mount_image(&server, ResponseTemplate::new(200).set_body_json(image_envelope()), 0).await;

    let orchestrator = Orchestrator::from_config(config_for(&server));
    let failure = orchestrator.run(architecture_request()).await.unwrap_err();

    assert_eq!(failure.stage, Stage::ReportPending);
    assert_eq!(
        failure.to_string(),
        "Failed to generate architectural concept. Please try again later."
    );
    assert_eq!(received(&server).await.len(), 1);
}

#[tokio::test]
async fn status_updates_follow_the_stage_sequence() {
    let server = server_with_report(architectural_brief_json()).await;
    mount_image(&server, ResponseTemplate::new(200).set_body_json(image_envelope()), 2).await;

    let orchestrator = Orchestrator::from_config(config_for(&server));
    let mut rx = orchestrator.subscribe();
    orchestrator.run(architecture_request()).await.unwrap();

    let statuses = drain(&mut rx);
    let stages: Vec<Stage> = statuses.iter().map(|s| s.stage).collect();
    assert_eq!(
        stages,
        vec![
            Stage::Building,
            Stage::ReportPending,
            Stage::ImagePending,
            Stage::ImagePending,
            Stage::Complete,
        ]
    );
    assert_eq!(statuses[3].label, "Drafting your floor plan...");
    let run_id = statuses[0].run_id;
    assert!(statuses.iter().all(|s| s.run_id == run_id));
}

#[tokio::test]
async fn failed_run_publishes_the_user_message() {
    let server = server_with_report(design_report_json()).await;
    mount_image(&server, ResponseTemplate::new(503), 1).await;

    let orchestrator = Orchestrator::from_config(config_for(&server));
    let mut rx = orchestrator.subscribe();
    orchestrator.run(interior_request("")).await.unwrap_err();

    let last = drain(&mut rx).pop().unwrap();
    assert_eq!(last.stage, Stage::Failed);
    assert_eq!(last.label, "Failed to generate image.");
}

#[tokio::test]
async fn concurrent_runs_keep_their_statuses_apart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r":generateContent$"))
        .and(body_string_contains("room_type"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(text_envelope(&design_report_json().to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r":generateContent$"))
        .and(body_string_contains("core_emotion"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_envelope(&architectural_brief_json().to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_image(&server, ResponseTemplate::new(200).set_body_json(image_envelope()), 3).await;

    let orchestrator = Orchestrator::from_config(config_for(&server));
    let mut rx = orchestrator.subscribe();
    let interior_id = Uuid::new_v4();
    let architecture_id = Uuid::new_v4();

    let (interior, architecture) = tokio::join!(
        orchestrator.run_as(interior_id, interior_request("")),
        orchestrator.run_as(architecture_id, architecture_request()),
    );
    assert!(matches!(interior, Ok(RunResult::Interior(_))));
    assert!(matches!(architecture, Ok(RunResult::Architecture(_))));

    let statuses = drain(&mut rx);
    assert_eq!(statuses.len(), 9);

    let labels_for = |id: Uuid| -> Vec<String> {
        statuses
            .iter()
            .filter(|status| status.belongs_to(Some(id)))
            .map(|status| status.label.clone())
            .collect()
    };
    assert_eq!(
        labels_for(interior_id),
        vec![
            "Preparing your request...",
            "Analyzing your style...",
            "Rendering your visualization...",
            "Done",
        ]
    );
    assert_eq!(
        labels_for(architecture_id),
        vec![
            "Preparing your request...",
            "Deconstructing your emotion...",
            "Rendering your visualization...",
            "Drafting your floor plan...",
            "Done",
        ]
    );
}

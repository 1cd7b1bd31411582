//! Integration tests for the regular-question form

use percept::{
    FORM_ERROR_SUMMARY, FormConfig, FormOutcome, RegularForm, RegularQuestion, StubSubmitter,
};

fn config() -> FormConfig {
    FormConfig::new(
        "occupations",
        vec![
            RegularQuestion::SingleChoice {
                title: "Gender".into(),
                other_enabled: true,
                options: vec!["Man".into(), "Woman".into()],
            },
            RegularQuestion::AgreementScale {
                title: "I would take this survey again".into(),
            },
            RegularQuestion::OpenShort {
                title: "Where do you live?".into(),
                min_length: Some(2),
                max_length: Some(30),
            },
        ],
    )
}

fn fill(form: &mut RegularForm<StubSubmitter>) {
    form.response_mut(0).unwrap().select(1);
    form.response_mut(1).unwrap().select(3);
    form.response_mut(2)
        .unwrap()
        .text_mut()
        .unwrap()
        .push_str("Vigo");
}

#[test]
fn test_empty_form_is_not_sent() {
    let mut form = RegularForm::new(config(), StubSubmitter::new(200, "{}")).unwrap();

    assert_eq!(form.submit().unwrap(), FormOutcome::Invalid);
    assert_eq!(form.error(0), Some("You must check one option."));
    assert_eq!(form.error(1), Some("You must choose one option."));
    assert_eq!(form.error(2), Some("You must answer this question."));
    assert_eq!(form.summary(), Some(FORM_ERROR_SUMMARY));
    assert!(form.submitter().requests().is_empty());
}

#[test]
fn test_fixing_answers_clears_errors() {
    let mut form = RegularForm::new(config(), StubSubmitter::new(200, "{}")).unwrap();
    form.submit().unwrap();
    fill(&mut form);

    assert_eq!(
        form.submit().unwrap(),
        FormOutcome::Saved { next_step: None }
    );
    assert!(form.errors().is_empty());
    assert_eq!(form.summary(), None);

    let requests = form.submitter().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "/survey/occupations");
    let body: serde_json::Value = serde_json::from_str(&requests[0].1).unwrap();
    assert_eq!(
        body,
        serde_json::json!([
            {"checkedAnswer": 1, "otherAnswer": null},
            {"checkedAnswer": 3},
            {"answerText": "Vigo"}
        ])
    );
}

#[test]
fn test_next_step_is_reported() {
    let mut form = RegularForm::new(
        config(),
        StubSubmitter::new(200, r#"{"next_step": "/survey/occupations/images"}"#),
    )
    .unwrap();
    fill(&mut form);

    assert_eq!(
        form.submit().unwrap(),
        FormOutcome::Saved {
            next_step: Some("/survey/occupations/images".into())
        }
    );
}

#[test]
fn test_any_2xx_saves_the_form() {
    let mut form = RegularForm::new(
        config(),
        StubSubmitter::new(201, r#"{"next_step": "/thanks"}"#),
    )
    .unwrap();
    fill(&mut form);

    assert_eq!(
        form.submit().unwrap(),
        FormOutcome::Saved {
            next_step: Some("/thanks".into())
        }
    );
    assert!(form.errors().is_empty());
}

#[test]
fn test_server_errors_render_inline() {
    let mut form = RegularForm::new(
        config(),
        StubSubmitter::new(400, r#"{"2": "Your answer must be between 5-30 characters length."}"#)
            .then(200, "{}"),
    )
    .unwrap();
    fill(&mut form);

    assert_eq!(
        form.submit().unwrap(),
        FormOutcome::Rejected { status: 400 }
    );
    assert_eq!(
        form.error(2),
        Some("Your answer must be between 5-30 characters length.")
    );
    assert_eq!(form.error(0), None);
    assert_eq!(form.summary(), Some(FORM_ERROR_SUMMARY));

    form.response_mut(2).unwrap().text_mut().unwrap().push_str(" city");
    assert_eq!(
        form.submit().unwrap(),
        FormOutcome::Saved { next_step: None }
    );
    assert_eq!(form.error(2), None);
}

#[test]
fn test_general_server_error_becomes_summary() {
    let mut form = RegularForm::new(
        config(),
        StubSubmitter::new(
            400,
            r#"{"-1": "Incorrect answer format.", "reason": "list index out of range"}"#,
        ),
    )
    .unwrap();
    fill(&mut form);

    form.submit().unwrap();
    assert!(form.errors().is_empty());
    assert_eq!(form.summary(), Some("Incorrect answer format."));
}

#[test]
fn test_unparsable_server_error_becomes_summary() {
    let mut form = RegularForm::new(
        config(),
        StubSubmitter::new(500, "There was an error with the database while saving your answers."),
    )
    .unwrap();
    fill(&mut form);

    assert_eq!(
        form.submit().unwrap(),
        FormOutcome::Rejected { status: 500 }
    );
    assert_eq!(
        form.summary(),
        Some("There was an error with the database while saving your answers.")
    );
}

#[test]
fn test_transport_failure_becomes_summary() {
    let mut form =
        RegularForm::new(config(), StubSubmitter::unreachable("connection reset")).unwrap();
    fill(&mut form);

    assert_eq!(form.submit().unwrap(), FormOutcome::Failed);
    assert_eq!(form.summary(), Some("connection reset"));
}

#[test]
fn test_form_without_questions_is_rejected() {
    let result = RegularForm::new(
        FormConfig::new("occupations", Vec::new()),
        StubSubmitter::new(200, "{}"),
    );
    assert!(result.is_err());
}

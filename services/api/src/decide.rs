use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::Args;
use loan_decision::config::{load_policy, load_policy_from_env, ConfigError};
use loan_decision::error::AppError;
use loan_decision::{Decision, DecisionEngine, DecisionRequest, DecisionResponse};

#[derive(Args, Debug)]
pub(crate) struct DecideArgs {
    /// Applicant's Estonian personal code
    #[arg(long)]
    pub(crate) personal_code: String,
    /// Requested loan amount in whole euros
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) amount: i64,
    /// Requested loan period in months
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) period: i32,
    /// Evaluation date used by age limits (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// JSON lending policy to use instead of the configured one
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Print the HTTP response body instead of a summary line
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_decide(args: DecideArgs) -> Result<(), AppError> {
    let DecideArgs {
        personal_code,
        amount,
        period,
        today,
        policy,
        json,
    } = args;

    let policy = match policy {
        Some(path) => load_policy(&path)?,
        None => load_policy_from_env()?,
    };
    let engine = DecisionEngine::try_new(Arc::new(policy)).map_err(ConfigError::from)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let request = DecisionRequest::new(personal_code, amount, period);

    let outcome = engine.evaluate_on(&request, today);
    if json {
        let body = match &outcome {
            Ok(decision) => DecisionResponse::from(*decision),
            Err(err) => DecisionResponse::rejected(err.to_string()),
        };
        match serde_json::to_string_pretty(&body) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => println!("Decision payload unavailable: {err}"),
        }
    } else if let Ok(decision) = &outcome {
        println!("{}", summary_line(&request, decision));
    }

    outcome.map(|_| ()).map_err(AppError::from)
}

fn summary_line(request: &DecisionRequest, decision: &Decision) -> String {
    let mut line = format!(
        "Approved {} EUR over {} months",
        decision.loan_amount, decision.loan_period
    );
    if decision.loan_period != request.loan_period {
        line.push_str(&format!(" (requested {} months)", request.loan_period));
    } else if decision.loan_amount != request.loan_amount {
        line.push_str(&format!(" (requested {} EUR)", request.loan_amount));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_decision::DecisionError;

    fn args(personal_code: &str, policy: Option<PathBuf>) -> DecideArgs {
        DecideArgs {
            personal_code: personal_code.to_string(),
            amount: 4000,
            period: 12,
            today: NaiveDate::from_ymd_opt(2025, 6, 1),
            policy,
            json: false,
        }
    }

    #[test]
    fn decide_does_not_need_server_settings() {
        std::env::remove_var("APP_POLICY_PATH");
        std::env::set_var("APP_PORT", "eighty");
        let outcome = run_decide(args("38411266610", None));
        std::env::remove_var("APP_PORT");

        outcome.expect("decision runs with the standard policy");
    }

    #[test]
    fn decide_reports_rejections_as_errors() {
        let err = run_decide(args("37605030299", None)).expect_err("debtor is rejected");
        assert!(matches!(err, AppError::Decision(DecisionError::NoValidLoan)));
    }

    #[test]
    fn decide_rejects_missing_policy_file() {
        let path = std::env::temp_dir().join("loan-decision-api-missing-policy.json");
        let err = run_decide(args("38411266610", Some(path))).expect_err("missing policy");
        assert!(matches!(err, AppError::Config(ConfigError::PolicyRead { .. })));
    }

    #[test]
    fn summary_mentions_period_adjustment() {
        let request = DecisionRequest::new("50307172740", 4000, 12);
        let decision = Decision {
            loan_amount: 2000,
            loan_period: 20,
        };
        assert_eq!(
            summary_line(&request, &decision),
            "Approved 2000 EUR over 20 months (requested 12 months)"
        );
    }

    #[test]
    fn summary_mentions_amount_adjustment() {
        let request = DecisionRequest::new("38411266610", 4000, 12);
        let decision = Decision {
            loan_amount: 3600,
            loan_period: 12,
        };
        assert_eq!(
            summary_line(&request, &decision),
            "Approved 3600 EUR over 12 months (requested 4000 EUR)"
        );
    }
}

// CLI layer: parses the positional arguments, resolves credentials and
// drives the login-then-create flow against the API client.

use crate::api::{ApiClient, ApiResponse, Candidate, CandidateRequest, LoginRequest};
use anyhow::Result;
use clap::Parser;
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Site every candidate is registered under; this tool is the intake path
/// for the Clinical Research Unit only.
pub const INTAKE_SITE: &str = "Clinical Research Unit";

/// PSCID used for every submission. The positional PSCID argument is
/// echoed back but never sent; see `submit`.
pub const INTAKE_PSCID: &str = "CRU0001";

// Demo account on the dev instance, used unless overridden via the
// environment.
const DEFAULT_USERNAME: &str = "krishna";
const DEFAULT_PASSWORD: &str = "demo20!9";

/// Positional arguments for one candidate registration.
#[derive(Parser, Debug)]
#[command(
    name = "cbigr-cli",
    about = "Register a candidate with the CBIGR LORIS instance"
)]
pub struct Args {
    /// Date of birth, YYYY-MM-DD
    pub dob: String,
    /// Sex as recorded in LORIS (e.g. Female, Male)
    pub sex: String,
    /// Electronic Data Capture reference
    pub edc: String,
    /// LORIS project to register the candidate under
    pub project: String,
    /// Requested PSCID. Currently echoed only: every submission uses the
    /// reserved CRU identifier instead.
    pub pscid: String,
}

/// Run one registration end to end and print the server's response.
pub fn run(args: Args, api: ApiClient) -> Result<()> {
    let login = resolve_credentials()?;
    let response = submit(&args, api, &login)?;
    println!("Status: {}", response.status);
    println!("{}", response.body);
    Ok(())
}

/// Login, build the candidate record and POST it. Returns the creation
/// response; the caller decides how to present it.
pub fn submit(args: &Args, mut api: ApiClient, login: &LoginRequest) -> Result<ApiResponse> {
    let pb = spinner("Logging in...");
    let auth = api.login(login);
    pb.finish_and_clear();
    api.set_token(&auth?.token);

    print_arguments(args);
    if args.pscid != INTAKE_PSCID {
        // The hardcoded PSCID predates this tool; surface the mismatch
        // instead of silently dropping the supplied value.
        eprintln!(
            "warning: PSCID {:?} is not submitted; intake registrations always use {:?}",
            args.pscid, INTAKE_PSCID
        );
    }

    let request = CandidateRequest {
        candidate: build_candidate(args),
    };
    println!("{}", serde_json::to_string_pretty(&request)?);

    let pb = spinner("Creating candidate...");
    let response = api.create_candidate(&request);
    pb.finish_and_clear();
    response
}

/// Map the parsed arguments onto the wire record, applying the fixed site
/// and the reserved PSCID.
pub fn build_candidate(args: &Args) -> Candidate {
    Candidate {
        project: args.project.clone(),
        pscid: INTAKE_PSCID.to_string(),
        edc: args.edc.clone(),
        dob: args.dob.clone(),
        sex: args.sex.clone(),
        site: INTAKE_SITE.to_string(),
    }
}

/// Credentials come from `CBIGR_USERNAME` / `CBIGR_PASSWORD`, falling back
/// to the embedded demo account. When the username is overridden but no
/// password is given, the demo password cannot apply, so prompt for one
/// with hidden input.
fn resolve_credentials() -> Result<LoginRequest> {
    let username =
        std::env::var("CBIGR_USERNAME").unwrap_or_else(|_| DEFAULT_USERNAME.to_string());
    let password = match std::env::var("CBIGR_PASSWORD") {
        Ok(p) => p,
        Err(_) if username == DEFAULT_USERNAME => DEFAULT_PASSWORD.to_string(),
        Err(_) => Password::new()
            .with_prompt(format!("Password for {}", username))
            .interact()?,
    };
    Ok(LoginRequest { username, password })
}

/// Echo the values about to be submitted, one per line.
fn print_arguments(args: &Args) {
    println!("DoB:     {}", args.dob);
    println!("Sex:     {}", args.sex);
    println!("Site:    {}", INTAKE_SITE);
    println!("EDC:     {}", args.edc);
    println!("Project: {}", args.project);
    println!("PSCID:   {}", args.pscid);
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

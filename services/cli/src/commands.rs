use crate::infra::{parse_experience_level, parse_job_type, parse_positive};
use careerlink::config::{AppConfig, DEFAULT_PAGE_SIZE};
use careerlink::domain::{split_list, AuthUser, ExperienceLevel, JobType, UserRole};
use careerlink::error::AppError;
use careerlink::normalize::{classify, Normalizer, RefPolicy};
use careerlink::query::FilterSpec;
use careerlink::service::{CareerLinkService, SearchOutcome};
use careerlink::session::SessionStore;
use careerlink::telemetry;
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug, Default)]
pub(crate) struct JobSearchArgs {
    /// Free-text search over title, company, description and skills
    #[arg(long, short = 'q')]
    pub(crate) query: Option<String>,
    /// Location substring, e.g. "Hanoi"
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// full-time, part-time, internship or contract
    #[arg(long, value_parser = parse_job_type)]
    pub(crate) job_type: Option<JobType>,
    /// entry, junior, mid or senior
    #[arg(long, value_parser = parse_experience_level)]
    pub(crate) experience_level: Option<ExperienceLevel>,
    /// Only remote (true) or only on-site (false) positions
    #[arg(long)]
    pub(crate) remote: Option<bool>,
    /// Comma-separated skills; any overlap matches
    #[arg(long)]
    pub(crate) skills: Option<String>,
    #[arg(long, value_parser = parse_positive)]
    pub(crate) page: Option<usize>,
    #[arg(long, value_parser = parse_positive)]
    pub(crate) limit: Option<usize>,
}

impl JobSearchArgs {
    pub(crate) fn into_filters(self) -> FilterSpec {
        FilterSpec {
            query: self.query,
            location: self.location,
            job_type: self.job_type,
            experience_level: self.experience_level,
            is_remote: self.remote,
            skills: self.skills.as_deref().map(split_list).unwrap_or_default(),
            page: self.page,
            limit: self.limit,
            ..FilterSpec::default()
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// JSON file holding a raw backend response
    pub(crate) file: PathBuf,
    /// Page size assumed when the response does not carry one
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_positive)]
    pub(crate) page_size: usize,
    /// Replace `$ref` back-references with the object they point to
    #[arg(long)]
    pub(crate) resolve_refs: bool,
    /// Expected collection key for `{ key: { $values } }` responses
    #[arg(long)]
    pub(crate) collection: Option<String>,
    /// Treat the file as a single entity rather than a list
    #[arg(long)]
    pub(crate) entity: bool,
}

/// What `session show` prints. The bearer token itself is never echoed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView {
    id: String,
    email: String,
    name: String,
    role: UserRole,
    authenticated: bool,
    has_token: bool,
}

impl From<AuthUser> for SessionView {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            authenticated: user.authenticated,
            has_token: user.token.is_some(),
        }
    }
}

fn load_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn run_job_search(args: JobSearchArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let mut service = CareerLinkService::from_config(&config.api);

    if config.api.token.is_none() {
        let session = SessionStore::new(config.session.path.clone()).load()?;
        if let Some(token) = session.and_then(|user| user.token) {
            service.set_token(Some(token));
        }
    }

    let filters = args.into_filters();
    match service.search_jobs(&filters).await? {
        SearchOutcome::Applied(page) => print_json(&page),
        outcome => {
            warn!(?outcome, "search produced no results to show");
            Ok(())
        }
    }
}

pub(crate) fn run_normalize(args: NormalizeArgs) -> Result<(), AppError> {
    load_config()?;

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&args.file)?)?;
    let policy = if args.resolve_refs {
        RefPolicy::Resolve
    } else {
        RefPolicy::Drop
    };

    let mut normalizer = Normalizer::new(args.page_size).with_ref_policy(policy);
    if let Some(key) = &args.collection {
        normalizer = normalizer.with_collection_key(key.clone());
    }

    if args.entity {
        return print_json(&normalizer.entity(raw));
    }

    let shape = classify(raw.clone(), args.collection.as_deref());
    info!(file = %args.file.display(), shape = shape.name(), "normalizing list response");
    print_json(&normalizer.list(raw))
}

pub(crate) fn show_session() -> Result<(), AppError> {
    let config = load_config()?;
    match SessionStore::new(config.session.path.clone()).load()? {
        Some(user) => print_json(&SessionView::from(user)),
        None => {
            println!("No active session.");
            Ok(())
        }
    }
}

pub(crate) fn clear_session() -> Result<(), AppError> {
    let config = load_config()?;
    let store = SessionStore::new(config.session.path.clone());
    if store.clear()? {
        println!("Signed out; removed {}", store.path().display());
    } else {
        println!("No active session.");
    }
    Ok(())
}

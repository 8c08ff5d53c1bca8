use crate::infra::{
    InMemoryJobRepository, InMemoryNotificationStore, InMemoryUserDirectory,
    UnreachableEmailDispatcher,
};
use chrono::{Duration, Utc};
use clap::Args;
use skillbridge::email::{EmailDispatcher, LogEmailDispatcher};
use skillbridge::error::AppError;
use skillbridge::jobs::{
    Applicant, ApplicationStatus, ApplicationTransition, DispatchOutcome, Job, JobService,
};
use skillbridge::notifications::NotificationCenter;
use skillbridge::sequence::InMemorySequence;
use skillbridge::users::{User, UserId, UserRegistry};
use std::sync::Arc;

const DEMO_POSTER: UserId = UserId(42);
const DEMO_APPLICANT: UserId = UserId(7);

#[derive(Args, Debug, Clone)]
pub(crate) struct DemoArgs {
    /// Title of the job posted during the walkthrough
    #[arg(long, default_value = "Backend Engineer")]
    pub(crate) job_title: String,
    /// Company advertising the job
    #[arg(long, default_value = "Acme Robotics")]
    pub(crate) company: String,
    /// Simulate an unreachable mail relay to show that applications still succeed
    #[arg(long)]
    pub(crate) fail_email: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    if args.fail_email {
        walk_through(&args, Arc::new(UnreachableEmailDispatcher))
    } else {
        walk_through(&args, Arc::new(LogEmailDispatcher))
    }
}

fn walk_through<E>(args: &DemoArgs, email: Arc<E>) -> Result<(), AppError>
where
    E: EmailDispatcher + 'static,
{
    let sequence = Arc::new(InMemorySequence::new());
    let users = Arc::new(InMemoryUserDirectory::default());
    let notifications = Arc::new(NotificationCenter::new(
        Arc::new(InMemoryNotificationStore::default()),
        sequence.clone(),
    ));
    let service = JobService::new(
        Arc::new(InMemoryJobRepository::default()),
        users.clone(),
        notifications.clone(),
        email,
        sequence,
    );

    if let Err(err) = users.upsert(User {
        id: DEMO_APPLICANT,
        name: "Priya Sharma".to_string(),
        email: "priya@example.com".to_string(),
    }) {
        println!("User directory unavailable: {err}");
        return Ok(());
    }

    println!("SkillBridge job lifecycle demo");

    let mut draft = Job::new(args.job_title.clone(), args.company.clone(), DEMO_POSTER);
    draft.location = "Remote".to_string();
    draft.skills_required = vec!["Rust".to_string(), "PostgreSQL".to_string()];
    let job = match service.post_job(draft) {
        Ok(job) => job,
        Err(err) => {
            println!("  Posting rejected [{}]: {err}", err.code());
            return Ok(());
        }
    };
    println!(
        "\nPosted job {} \"{}\" at {} ({})",
        job.id,
        job.job_title,
        job.company,
        job.job_status.label()
    );
    if let Some(posted) = job.post_time {
        println!("  Posted at: {}", posted.to_rfc3339());
    }
    print_inbox(&notifications, DEMO_POSTER);

    println!("\nApplication by user {DEMO_APPLICANT}");
    match service.apply_job(job.id, Applicant::new(DEMO_APPLICANT)) {
        Ok(receipt) => {
            println!("  Applicants on job: {}", receipt.job.applicants.len());
            println!("  Confirmation email: {}", describe(&receipt.email));
        }
        Err(err) => println!("  Application rejected [{}]: {err}", err.code()),
    }
    match service.apply_job(job.id, Applicant::new(DEMO_APPLICANT)) {
        Ok(_) => println!("  Duplicate application was accepted"),
        Err(err) => println!("  Second application rejected [{}]: {err}", err.code()),
    }

    let interview_at = Utc::now() + Duration::days(3);
    println!("\nScheduling interview for {}", interview_at.to_rfc3339());
    match service.change_app_status(ApplicationTransition {
        id: job.id,
        applicant_id: DEMO_APPLICANT,
        application_status: ApplicationStatus::Interviewing,
        interview_time: Some(interview_at),
    }) {
        Ok(change) => {
            println!("  Matching applications: {}", change.matched);
            for outcome in &change.notifications {
                println!("  Applicant notification: {}", describe(outcome));
            }
        }
        Err(err) => println!("  Status change failed [{}]: {err}", err.code()),
    }
    print_inbox(&notifications, DEMO_APPLICANT);

    match service.get_history(DEMO_APPLICANT, ApplicationStatus::Interviewing) {
        Ok(history) => println!(
            "\nApplicant {DEMO_APPLICANT} is interviewing for {} job(s)",
            history.len()
        ),
        Err(err) => println!("\nHistory unavailable [{}]: {err}", err.code()),
    }
    match service.get_jobs_posted_by(DEMO_POSTER) {
        Ok(posted) => println!("Poster {DEMO_POSTER} has {} job(s) listed", posted.len()),
        Err(err) => println!("Posted jobs unavailable [{}]: {err}", err.code()),
    }

    Ok(())
}

fn print_inbox(center: &NotificationCenter<InMemoryNotificationStore>, user: UserId) {
    match center.unread_for(user) {
        Ok(unread) if unread.is_empty() => println!("  Inbox for user {user}: empty"),
        Ok(unread) => {
            println!("  Inbox for user {user}:");
            for entry in unread {
                println!("  - {}: {} ({})", entry.action, entry.message, entry.route);
            }
        }
        Err(err) => println!("  Inbox for user {user} unavailable: {err}"),
    }
}

fn describe(outcome: &DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::Delivered => "delivered".to_string(),
        DispatchOutcome::Failed { reason } => format!("not delivered ({reason})"),
    }
}

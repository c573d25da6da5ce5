// School portal CLI
// Drives the backend facades, the attendance buffer and the dashboard views from a terminal

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::*;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::level_filters::LevelFilter;

use school_portal::attendance::{AttendanceBuffer, CommitOutcome, RosterStatus};
use school_portal::config::normalize_url;
use school_portal::dashboard::{load_student_summary, load_teacher_overview};
use school_portal::directory::StudentDirectory;
use school_portal::domain::{Id, NewAssignment, NewCourse, Registration};
use school_portal::session::{FileSessionStore, SessionEvent, SessionManager};
use school_portal::view::{self, AttendanceTable, StatCard, StudentTable, Tone};
use school_portal::{logging, ApiClient, Config, PortalError, Result};

#[derive(Parser)]
#[command(name = "school-cli")]
#[command(about = "School portal command-line client", long_about = None)]
struct Cli {
    /// Backend API base URL (overrides PORTAL_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Payment service base URL (overrides PORTAL_PAYMENT_URL)
    #[arg(long)]
    payment_url: Option<String>,

    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        role: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Course listing and creation
    #[command(subcommand)]
    Courses(CourseCommands),

    /// Browse students
    Students {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short, long)]
        course: Option<Id>,

        #[arg(short, long)]
        search: Option<String>,
    },

    /// Attendance taking and reports
    #[command(subcommand)]
    Attendance(AttendanceCommands),

    #[command(subcommand)]
    Assignments(AssignmentCommands),

    #[command(subcommand)]
    Grades(GradeCommands),

    #[command(subcommand)]
    Payments(PaymentCommands),

    /// Dashboard summary
    Dashboard {
        /// Show the student dashboard instead of the teacher one
        #[arg(long)]
        student: bool,
    },
}

#[derive(Subcommand)]
enum CourseCommands {
    List,
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        code: String,

        /// Seat limit
        #[arg(short, long)]
        max: Option<u32>,
    },
}

#[derive(Subcommand)]
enum AttendanceCommands {
    /// All stored attendance records
    List,

    /// Interactive attendance taking for one course
    Take {
        #[arg(short, long)]
        course: Id,
    },

    /// Mark statuses and save in one go
    Mark {
        #[arg(short, long)]
        course: Id,

        /// STUDENT_ID=STATUS, repeatable (e.g. 12=Present)
        #[arg(short = 's', long = "set", value_parser = parse_mark)]
        marks: Vec<(Id, String)>,

        /// Also write the CSV export to this path
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Per-student totals for a month
    Monthly {
        #[arg(short, long)]
        course: Id,

        #[arg(short, long)]
        year: i32,

        #[arg(short, long)]
        month: u32,
    },
}

#[derive(Subcommand)]
enum AssignmentCommands {
    List,
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        course: Id,

        /// Due date, YYYY-MM-DD
        #[arg(short, long)]
        due: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
enum GradeCommands {
    List,
    Set {
        /// Grade record id
        #[arg(short, long)]
        id: Id,

        #[arg(short, long)]
        points: f64,
    },
}

#[derive(Subcommand)]
enum PaymentCommands {
    Create {
        #[arg(short, long)]
        amount: f64,

        #[arg(short, long)]
        description: String,
    },
    List,
    Check {
        #[arg(short, long)]
        id: String,
    },
    /// Save the KHQR image for a QR payload
    Qr {
        #[arg(short, long)]
        data: String,

        #[arg(short, long, default_value = "khqr.png")]
        out: PathBuf,
    },
    Tuition,
}

fn parse_mark(raw: &str) -> std::result::Result<(Id, String), String> {
    let (id, status) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected STUDENT_ID=STATUS, got {:?}", raw))?;
    let id = id
        .trim()
        .parse::<Id>()
        .map_err(|_| format!("invalid student id {:?}", id))?;
    Ok((id, status.trim().to_string()))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(2);
        }
    };

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    logging::init(&config.logging, level);

    if let Some(url) = &cli.api_url {
        config.api.base_url = normalize_url(url);
    }
    if let Some(url) = &cli.payment_url {
        config.api.payment_url = normalize_url(url);
    }

    let session = match SessionManager::new(FileSessionStore::new(&config.session.file)) {
        Ok(session) => Arc::new(session),
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(2);
        }
    };
    let mut events = session.subscribe();

    let api = match ApiClient::new(&config.api, session) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(2);
        }
    };

    let result = run(cli.command, &api).await;

    while let Ok(event) = events.try_recv() {
        if event == SessionEvent::Expired {
            println!(
                "{} Session expired, please log in again ({})",
                "⚠".yellow(),
                "school-cli login".cyan()
            );
        }
    }

    if let Err(e) = result {
        println!("{} {}", "✗".red(), e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, api: &ApiClient) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            let session = api.login(&email, &password).await?;
            let name = session
                .user
                .map(|u| u.full_name)
                .unwrap_or_else(|| email.clone());
            println!("{} Signed in as {}", "✓".green(), name.bold());
        }
        Commands::Register {
            name,
            email,
            password,
            phone,
            role,
        } => {
            let registration = Registration {
                full_name: name,
                email,
                password,
                phone_number: phone,
                role,
            };
            api.register(&registration).await?;
            println!("{} Account created for {}", "✓".green(), registration.email);
        }
        Commands::Logout => {
            api.logout().await?;
            println!("{} Signed out", "✓".green());
        }
        Commands::Whoami => {
            let signed_in = api.session().is_signed_in().await;
            match api.session().user().await {
                Some(user) => {
                    println!("{}", user.full_name.bold());
                    println!("  Email: {}", user.email);
                    if let Some(role) = user.role {
                        println!("  Role: {}", role);
                    }
                }
                None if signed_in => println!("Signed in (no cached profile)"),
                None => println!("{}", "Not signed in".yellow()),
            }
        }
        Commands::Courses(cmd) => courses(cmd, api).await?,
        Commands::Students {
            page,
            course,
            search,
        } => students(api, page, course, search).await,
        Commands::Attendance(cmd) => attendance(cmd, api).await?,
        Commands::Assignments(cmd) => assignments(cmd, api).await?,
        Commands::Grades(cmd) => grades(cmd, api).await?,
        Commands::Payments(cmd) => payments(cmd, api).await?,
        Commands::Dashboard { student } => dashboard(api, student).await?,
    }
    Ok(())
}

async fn courses(cmd: CourseCommands, api: &ApiClient) -> Result<()> {
    match cmd {
        CourseCommands::List => {
            let courses = api.list_courses().await?;
            if courses.is_empty() {
                println!("{}", "No courses".yellow());
            }
            for course in courses {
                let seats = format!("{}/{}", course.students, course.max);
                println!(
                    "{:>5}  {:<10} {:<36} {}",
                    course.id,
                    course.code.cyan(),
                    course.name,
                    if course.is_full { seats.red() } else { seats.green() }
                );
            }
        }
        CourseCommands::Create { name, code, max } => {
            let course = NewCourse {
                name,
                code,
                max,
                description: None,
            };
            api.create_course(&course).await?;
            println!("{} Course {} created", "✓".green(), course.code.bold());
        }
    }
    Ok(())
}

async fn students(api: &ApiClient, page: u32, course: Option<Id>, search: Option<String>) {
    let mut directory = StudentDirectory::with_filters(api.clone(), course, search.as_deref());
    directory.load(page.saturating_sub(1)).await;

    match view::student_table(directory.status(), directory.current()) {
        StudentTable::Message(message) => println!("{}", message.yellow()),
        StudentTable::Rows { rows, pagination } => {
            for row in rows {
                println!(
                    "{:>6}  {:<28} {:<10} {:<30} {}",
                    row.id,
                    row.name.bold(),
                    paint(&row.course.label, row.course.tone),
                    row.email,
                    row.status.green()
                );
            }
            println!("\n{}", pagination.label.dimmed());
        }
    }
}

async fn attendance(cmd: AttendanceCommands, api: &ApiClient) -> Result<()> {
    match cmd {
        AttendanceCommands::List => {
            let records = api.list_attendance().await?;
            for r in records {
                println!(
                    "{:<12} {:>6}  {:<24} {:<8} {}",
                    r.attendance_date.unwrap_or_default(),
                    r.student_id,
                    r.student_name.unwrap_or_default(),
                    r.status,
                    r.check_in_time.unwrap_or_default().dimmed()
                );
            }
        }
        AttendanceCommands::Take { course } => take_attendance(api, course).await?,
        AttendanceCommands::Mark {
            course,
            marks,
            export,
        } => {
            let mut buffer = AttendanceBuffer::new(api.clone());
            if let RosterStatus::Failed(reason) = buffer.select_course(course).await {
                return Err(PortalError::internal(format!(
                    "Failed to load students: {}",
                    reason
                )));
            }
            for (id, status) in &marks {
                if let Err(e) = buffer.set_status(*id, status) {
                    println!("{} {}", "⚠".yellow(), e);
                }
            }
            if let Some(path) = export {
                tokio::fs::write(&path, buffer.export_csv()).await?;
                println!("{} Exported to {}", "✓".green(), path.display());
            }
            match buffer.commit().await? {
                CommitOutcome::NothingToSave => println!("{}", "No changes to save.".yellow()),
                CommitOutcome::Saved { count } => {
                    println!("{} Attendance saved for {} students", "✓".green(), count)
                }
            }
        }
        AttendanceCommands::Monthly {
            course,
            year,
            month,
        } => {
            let rows = api.monthly_attendance_overview(course, year, month).await?;
            println!(
                "{:>6}  {:<28} {:>7} {:>7} {:>7}",
                "ID", "Name", "Present", "Absent", "Late"
            );
            for row in rows {
                println!(
                    "{:>6}  {:<28} {:>7} {:>7} {:>7}",
                    row.student_id,
                    row.student_name,
                    row.present_count.to_string().green(),
                    row.absent_count.to_string().red(),
                    row.late_count.to_string().yellow()
                );
            }
        }
    }
    Ok(())
}

async fn take_attendance(api: &ApiClient, course: Id) -> Result<()> {
    let mut buffer = AttendanceBuffer::new(api.clone());
    buffer.select_course(course).await;
    print_attendance(&buffer);
    println!("Type {} for commands, {} to leave\n", "help".cyan(), "quit".cyan());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(format!("{} ", "►".cyan()).as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => {
                if buffer.pending_count() > 0 {
                    println!(
                        "{} {} unsaved change(s) discarded",
                        "⚠".yellow(),
                        buffer.pending_count()
                    );
                }
                break;
            }
            ["help"] => print_take_help(),
            ["show"] => print_attendance(&buffer),
            ["course", id] => match id.parse::<Id>() {
                Ok(id) => {
                    buffer.select_course(id).await;
                    print_attendance(&buffer);
                }
                Err(_) => println!("{} Invalid course id", "✗".yellow()),
            },
            ["mark", id, status] => match id.parse::<Id>() {
                Ok(id) => match buffer.set_status(id, status) {
                    Ok(count) => println!(
                        "{} {} → {}  [{}]",
                        "✓".green(),
                        id,
                        status,
                        view::SaveButton::for_pending(count).label
                    ),
                    Err(e) => println!("{} {}", "⚠".yellow(), e),
                },
                Err(_) => println!("{} Invalid student id", "✗".yellow()),
            },
            ["save"] => match buffer.commit().await {
                Ok(CommitOutcome::NothingToSave) => println!("{}", "No changes to save.".yellow()),
                Ok(CommitOutcome::Saved { count }) => {
                    println!("{} Attendance saved ({} students)", "✓".green(), count)
                }
                Err(e) => {
                    println!("{} Error saving attendance: {}", "✗".red(), e);
                    if e.is_unauthorized() {
                        break;
                    }
                }
            },
            ["export", rest @ ..] => {
                if buffer.roster().is_empty() {
                    println!("{}", "No data to export".yellow());
                    continue;
                }
                let path = match rest {
                    [path] => PathBuf::from(*path),
                    _ => PathBuf::from(
                        buffer
                            .export_file_name()
                            .unwrap_or_else(|| "attendance.csv".to_string()),
                    ),
                };
                match tokio::fs::write(&path, buffer.export_csv()).await {
                    Ok(()) => println!("{} Exported to {}", "✓".green(), path.display()),
                    Err(e) => println!("{} Export failed: {}", "✗".red(), e),
                }
            }
            _ => println!("{} Unknown command. Type 'help'.", "✗".yellow()),
        }
    }

    Ok(())
}

fn print_take_help() {
    println!("\n{}", "Attendance Commands".bold());
    println!("{}", "─".repeat(60));
    println!("  {}   mark a student (Present, Absent, Late)", "mark <id> <status>".cyan());
    println!("  {}                 save pending changes", "save".cyan());
    println!("  {}                 redraw the class list", "show".cyan());
    println!("  {}        switch course (drops unsaved changes)", "course <id>".cyan());
    println!("  {}        write the CSV export", "export [path]".cyan());
    println!("  {}                 leave", "quit".cyan());
    println!();
}

fn print_attendance<B, C>(buffer: &AttendanceBuffer<B, C>)
where
    B: school_portal::attendance::AttendanceBackend,
    C: school_portal::attendance::Clock,
{
    let view = view::attendance_view(buffer);
    match view.table {
        AttendanceTable::NoCourse => println!("{}", view::SELECT_COURSE.yellow()),
        AttendanceTable::LoadFailed { message } => println!("{}", message.red()),
        AttendanceTable::Empty { message } => println!("{}", message.yellow()),
        AttendanceTable::Rows(rows) => {
            println!("{}", "═".repeat(60).green());
            for row in rows {
                println!(
                    "{:>6}  {:<30} {:<10} {}",
                    row.id,
                    row.name,
                    paint(&row.badge.label, row.badge.tone),
                    row.time.dimmed()
                );
            }
            println!("{}", "═".repeat(60).green());
        }
    }
    let button = if view.save_button.highlighted {
        view.save_button.label.bold()
    } else {
        view.save_button.label.dimmed()
    };
    println!("{}", button);
}

async fn assignments(cmd: AssignmentCommands, api: &ApiClient) -> Result<()> {
    match cmd {
        AssignmentCommands::List => {
            for a in api.list_assignments().await? {
                println!(
                    "{:>5}  {:<36} course {:<6} due {}",
                    a.id,
                    a.title.bold(),
                    a.course_id.map(|c| c.to_string()).unwrap_or_default(),
                    a.due_date.unwrap_or_else(|| "-".to_string())
                );
            }
        }
        AssignmentCommands::Create {
            title,
            course,
            due,
            description,
        } => {
            let assignment = NewAssignment {
                title,
                course_id: course,
                due_date: due,
                description,
            };
            api.create_assignment(&assignment).await?;
            println!("{} Assignment {} created", "✓".green(), assignment.title.bold());
        }
    }
    Ok(())
}

async fn grades(cmd: GradeCommands, api: &ApiClient) -> Result<()> {
    match cmd {
        GradeCommands::List => {
            for g in api.list_grades().await? {
                println!(
                    "{:>5}  {:<28} course {:<6} {}",
                    g.id,
                    g.student_name,
                    g.course_id.map(|c| c.to_string()).unwrap_or_default(),
                    g.points
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "-".to_string())
                        .bold()
                );
            }
        }
        GradeCommands::Set { id, points } => {
            api.update_grade(id, points).await?;
            println!("{} Grade {} set to {}", "✓".green(), id, points);
        }
    }
    Ok(())
}

async fn payments(cmd: PaymentCommands, api: &ApiClient) -> Result<()> {
    match cmd {
        PaymentCommands::Create {
            amount,
            description,
        } => {
            let payment = api.create_payment(amount, &description).await?;
            println!("{} Payment created", "✓".green());
            if let Some(id) = payment.id_text() {
                println!("  Payment ID: {}", id.bold());
            }
            if let Some(qr) = payment.qr_string {
                println!("  QR: {}", qr.dimmed());
            }
        }
        PaymentCommands::List => {
            for p in api.list_payments().await? {
                println!(
                    "{:<14} {:>10} {:<12} {}",
                    p.id_text().unwrap_or_default(),
                    p.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(),
                    p.status.unwrap_or_default(),
                    p.description.unwrap_or_default()
                );
            }
        }
        PaymentCommands::Check { id } => {
            let status = api.check_payment_status(&id).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        PaymentCommands::Qr { data, out } => {
            let image = api.fetch_qr_image(&data).await?;
            tokio::fs::write(&out, image).await?;
            println!("{} QR image saved to {}", "✓".green(), out.display());
        }
        PaymentCommands::Tuition => {
            let tuition = api.my_tuition().await?;
            println!("{}", serde_json::to_string_pretty(&tuition)?);
        }
    }
    Ok(())
}

async fn dashboard(api: &ApiClient, student: bool) -> Result<()> {
    if student {
        let summary = load_student_summary(api).await?;
        print_cards(&view::student_cards(&summary));
        println!("\n{}", "Courses".bold());
        for c in &summary.courses {
            println!("  {:<10} {}", c.code.cyan(), c.name);
        }
        println!("\n{}", "Assignments".bold());
        for a in &summary.assignments {
            println!("  {:<36} due {}", a.title, a.due_date.as_deref().unwrap_or("-"));
        }
    } else {
        let overview = load_teacher_overview(api).await?;
        print_cards(&view::teacher_cards(&overview));
    }
    Ok(())
}

fn print_cards(cards: &[StatCard]) {
    println!("{}", "═".repeat(40).green());
    for card in cards {
        println!("  {:<20} {}", card.title, card.value.bold());
    }
    println!("{}", "═".repeat(40).green());
}

fn paint(label: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Green => label.green(),
        Tone::Red => label.red(),
        Tone::Yellow => label.yellow(),
        Tone::Indigo => label.blue(),
        Tone::Gray => label.dimmed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mark() {
        assert_eq!(parse_mark("12=Present").unwrap(), (12, "Present".to_string()));
        assert_eq!(parse_mark(" 3 = Late ").unwrap(), (3, "Late".to_string()));
        assert!(parse_mark("Present").is_err());
        assert!(parse_mark("x=Present").is_err());
    }

    #[test]
    fn test_cli_parses_mark_command() {
        let cli = Cli::try_parse_from([
            "school-cli",
            "attendance",
            "mark",
            "--course",
            "4",
            "--set",
            "1=Present",
            "--set",
            "2=Absent",
        ])
        .unwrap();
        match cli.command {
            Commands::Attendance(AttendanceCommands::Mark { course, marks, export }) => {
                assert_eq!(course, 4);
                assert_eq!(marks.len(), 2);
                assert!(export.is_none());
            }
            _ => panic!("expected attendance mark"),
        }
    }
}

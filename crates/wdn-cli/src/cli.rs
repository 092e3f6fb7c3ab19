use clap::{Parser, Subcommand, ValueEnum};

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Raw,
}

/// Top-level CLI parser for the `wdn` binary.
#[derive(Debug, Parser)]
#[command(name = "wdn", version, about = "Warden - trait-based dormitory room allocation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage students
    Student {
        #[command(subcommand)]
        action: StudentCommands,
    },
    /// Manage questionnaire submissions
    Questionnaire {
        #[command(subcommand)]
        action: QuestionnaireCommands,
    },
    /// Manage hostels and their rooms
    Hostel {
        #[command(subcommand)]
        action: HostelCommands,
    },
    /// Derive trait profiles for questionnaire submissions without one
    GenerateTraits,
    /// Run the allocation engine over the unallocated cohort
    Allocate,
    /// Resolve one student's allocation status
    Status {
        /// Student ID
        student_id: String,
    },
    /// Compatibility distribution and dashboard counts
    Stats,
    /// Inspect the append-only audit trail, newest first
    Audit {
        /// student, hostel, room, allocation, questionnaire, trait_profile, run
        #[arg(long)]
        entity_type: Option<String>,
        #[arg(long)]
        entity_id: Option<String>,
        /// e.g. allocated, run_completed, hostel_deleted
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Debug, Subcommand)]
pub enum StudentCommands {
    /// Register a new student
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// male or female
        #[arg(long)]
        gender: String,
        /// 100, 200, 300, 400, or 500
        #[arg(long)]
        level: String,
        #[arg(long)]
        matric_no: String,
    },
    /// Get a student by ID
    Get { id: String },
    /// List students by ascending ID
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

#[derive(Debug, Subcommand)]
pub enum QuestionnaireCommands {
    /// Submit (or resubmit) answers as repeated key=value pairs
    Submit {
        student_id: String,
        /// e.g. --answer sleepSchedule=night --answer noiseTolerance=low
        #[arg(long = "answer", value_name = "KEY=VALUE")]
        answers: Vec<String>,
    },
    /// Show a student's stored submission
    Get { student_id: String },
}

#[derive(Debug, Subcommand)]
pub enum HostelCommands {
    /// Create a hostel with its rooms in one transaction
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        warden: String,
        /// male, female, or mixed
        #[arg(long)]
        gender: String,
        /// e.g. --room A1:4 --room A2:2
        #[arg(long = "room", value_name = "NUMBER:CAPACITY")]
        rooms: Vec<String>,
    },
    /// List all hostels
    List,
    /// Delete a hostel, its rooms, and their allocations
    Delete { id: String },
}

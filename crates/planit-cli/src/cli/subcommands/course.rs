use clap::Subcommand;

/// Course commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CourseCommands {
    /// Get a course by code.
    Get { code: String },
    /// Search courses by code or name, code-prefix matches first.
    Search {
        /// Free text; omit to list every course passing the filters
        query: Option<String>,
        /// Only courses offered this semester
        #[arg(long)]
        available: bool,
        #[arg(long)]
        faculty: Option<String>,
        #[arg(long)]
        points_min: Option<f64>,
        #[arg(long)]
        points_max: Option<f64>,
        #[arg(long)]
        median_min: Option<f64>,
        #[arg(long)]
        median_max: Option<f64>,
        /// Restrict to these course codes (comma separated)
        #[arg(long = "in", value_delimiter = ',')]
        requirement_codes: Vec<String>,
        /// 1-based page number
        #[arg(long)]
        page: Option<usize>,
        /// Page size, or "all"
        #[arg(long)]
        page_size: Option<String>,
    },
    /// List courses in store or sorted order.
    List {
        /// Sort key: code, name, points, median
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Distinct faculty names across all courses.
    Faculties,
    /// Number of stored courses.
    Count,
    /// When courses were last synced.
    LastSync,
}

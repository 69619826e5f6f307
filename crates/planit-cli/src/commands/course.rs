use anyhow::bail;
use planit_core::entities::Course;
use planit_core::enums::{SortDirection, SortKey};
use planit_search::{CourseQuery, CourseQueryResult, PageSize};
use planit_state::CourseProvider;
use serde::Serialize;
use serde_json::json;

use crate::cli::subcommands::CourseCommands;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::parse::{default_page_size, parse_enum, parse_page_size};
use crate::context::AppContext;
use crate::output::output;

/// Table projection of a course; the full record is too wide for a row.
#[derive(Debug, Serialize, PartialEq)]
struct CourseRow<'a> {
    code: &'a str,
    name: Option<&'a str>,
    points: Option<f64>,
    median: Option<f64>,
    faculty: Option<&'a str>,
    available: bool,
}

impl<'a> From<&'a Course> for CourseRow<'a> {
    fn from(course: &'a Course) -> Self {
        Self {
            code: &course.code,
            name: course.name.as_deref(),
            points: course.points,
            median: course.median,
            faculty: course.faculty_name(),
            available: course.is_available(),
        }
    }
}

fn output_courses(courses: &[Course], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Table {
        let rows = courses.iter().map(CourseRow::from).collect::<Vec<_>>();
        return output(&rows, format);
    }
    output(&courses, format)
}

/// Handle `planit course`.
pub async fn handle(
    action: &CourseCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let provider = &ctx.provider;
    let fallback_page_size = default_page_size(flags.limit, ctx.config.general.default_page_size);

    match action {
        CourseCommands::Get { code } => {
            let Some(course) = provider.course(code.trim()).await? else {
                bail!("course '{code}' not found");
            };
            output(&course, flags.format)
        }
        CourseCommands::Search {
            query,
            available,
            faculty,
            points_min,
            points_max,
            median_min,
            median_max,
            requirement_codes,
            page,
            page_size,
        } => {
            let page_size = match page_size {
                Some(raw) => parse_page_size(raw)?,
                None => fallback_page_size,
            };
            let query = CourseQuery {
                query: query.clone(),
                available_only: *available,
                faculty: faculty.clone(),
                points_min: *points_min,
                points_max: *points_max,
                median_min: *median_min,
                median_max: *median_max,
                requirement_course_codes: requirement_codes.clone(),
                page: *page,
                page_size,
            };
            let result = provider.query_courses(&query).await?;
            tracing::debug!(
                total = result.total,
                returned = result.courses.len(),
                "course search"
            );
            output_search(&result, flags.format)
        }
        CourseCommands::List { sort, desc, offset } => {
            let limit = match fallback_page_size {
                PageSize::Limit(limit) => limit,
                PageSize::All => provider.course_count().await?,
            };
            let offset = *offset as usize;
            let courses = match (sort, desc) {
                (None, false) => provider.courses_page(limit, offset).await?,
                (sort, desc) => {
                    let key = match sort {
                        Some(raw) => parse_enum::<SortKey>(raw, "sort key")?,
                        None => SortKey::Code,
                    };
                    let direction = if *desc {
                        SortDirection::Desc
                    } else {
                        SortDirection::Asc
                    };
                    provider.courses_sorted(limit, offset, key, direction).await?
                }
            };
            output_courses(&courses, flags.format)
        }
        CourseCommands::Faculties => output(&provider.course_faculties().await?, flags.format),
        CourseCommands::Count => output(
            &json!({ "count": provider.course_count().await? }),
            flags.format,
        ),
        CourseCommands::LastSync => output(
            &json!({ "last_sync": provider.courses_last_sync().await? }),
            flags.format,
        ),
    }
}

fn output_search(result: &CourseQueryResult, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Table {
        output_courses(&result.courses, format)?;
        println!("({} of {} matches)", result.courses.len(), result.total);
        return Ok(());
    }
    output(result, format)
}

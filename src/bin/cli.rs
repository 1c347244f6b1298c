use chrono::NaiveDate;
use curriculum_planner::{
    CurriculumRequest, DistributionStrategy, ExportLayout, LessonRecord, LessonStatus,
    LessonUpdate, Pacing, Planner, PlannerConfig, PlannerError, TeachingWeek, TopicSource,
    grade_levels, lessons_dataframe, load_calendar_from_csv, parse_topic_list, save_lessons_to_csv,
};
use polars::prelude::{AnyValue, DataFrame};
use std::collections::HashMap;
use std::io::{self, Write};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            let pad = widths[ci].saturating_sub(value.chars().count());
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_lessons(lessons: &[LessonRecord]) {
    match lessons_dataframe(lessons) {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error rendering lessons: {}", e),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  calendar <csv_path>                Load school calendar (needs a 'Date' column)\n  subject <text...>                  Set the subject\n  grade <text...>                    Set the grade level (e.g. 9 or Grade 9)\n  pacing <slow|normal|fast>          Set pacing\n  days <Mon,Wed,...>                 Set teaching weekdays\n  topics <t1; t2; ...>               Use a custom topic list\n  topics bank                        Use the preloaded curriculum bank\n  bank                               List preloaded curricula\n  strategy [expansion|stride]        Show or set the distribution strategy\n  form                               Show current selections\n  build                              Build the curriculum and save it\n  classes                            List stored classes with progress\n  use <class key...>                 Select a stored class for editing\n  show                               Show lessons of the selected class\n  activity <index> <text...>         Set lesson activity\n  homework <index> <text...>         Set lesson homework\n  notes    <index> <text...>         Set lesson notes\n  status   <index> <upcoming|completed|missed>\n                                     Set lesson status\n  progress                           Show progress of the selected class\n  export <summary|full> <path>       Write the selected class to CSV\n  quit|exit                          Exit"
    );
}

fn print_form(request: &CurriculumRequest, dates: Option<&Vec<NaiveDate>>, planner: &Planner) {
    let topics = match &request.topics {
        TopicSource::Bank => "curriculum bank".to_string(),
        TopicSource::Custom(topics) => format!("{} custom", topics.len()),
    };
    let calendar = dates
        .map(|d| format!("{} dates", d.len()))
        .unwrap_or_else(|| "not loaded".to_string());
    println!("Subject  : {}", request.subject);
    println!("Grade    : {}", request.grade);
    println!("Pacing   : {}", request.pacing);
    println!("Days     : {}", request.week.describe());
    println!("Topics   : {}", topics);
    println!("Calendar : {}", calendar);
    println!("Strategy : {}", planner.strategy());
}

fn normalize_grade(input: &str) -> String {
    match input.trim().parse::<u32>() {
        Ok(n) => format!("Grade {n}"),
        Err(_) => input.trim().to_string(),
    }
}

fn parse_index(s: Option<&str>) -> Option<usize> {
    s.and_then(|v| v.parse::<usize>().ok())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match PlannerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    let mut planner = match Planner::from_config(&config) {
        Ok(planner) => planner,
        Err(e) => {
            eprintln!("Could not open status store: {}", e);
            std::process::exit(1);
        }
    };

    let mut request = CurriculumRequest::default();
    let mut calendar_dates: Option<Vec<NaiveDate>> = None;
    let mut current_class: Option<String> = None;
    let mut class_subjects: HashMap<String, String> = HashMap::new();

    println!("Curriculum Planner (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "calendar" => match parts.next() {
                Some(path) => match load_calendar_from_csv(path) {
                    Ok(dates) => {
                        println!("Loaded {} calendar dates from {}.", dates.len(), path);
                        calendar_dates = Some(dates);
                    }
                    Err(e) => println!("Error loading calendar: {}", e),
                },
                None => println!("Usage: calendar <csv_path>"),
            },
            "subject" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    println!("Usage: subject <text...>");
                    continue;
                }
                request.subject = rest.join(" ");
                println!("Subject set to {}.", request.subject);
            }
            "grade" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    println!("Usage: grade <text...>");
                    println!("Grades: {}", grade_levels().join(", "));
                    continue;
                }
                request.grade = normalize_grade(&rest.join(" "));
                println!("Grade set to {}.", request.grade);
            }
            "pacing" => match parts.next().map(Pacing::from_str) {
                Some(Ok(pacing)) => {
                    request.pacing = pacing;
                    println!("Pacing set to {}.", pacing);
                }
                Some(Err(e)) => println!("Error: {}", e),
                None => println!("Usage: pacing <slow|normal|fast>"),
            },
            "days" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    println!("Usage: days <Mon,Wed,...>");
                    continue;
                }
                match TeachingWeek::parse_list(&rest.join(",")) {
                    Ok(week) => {
                        request.week = week;
                        println!("Teaching days: {}.", request.week.describe());
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "topics" => {
                let rest: Vec<&str> = parts.collect();
                match rest.as_slice() {
                    [] => println!("Usage: topics <t1; t2; ...> | topics bank"),
                    ["bank"] => {
                        request.topics = TopicSource::Bank;
                        println!("Topics will come from the curriculum bank.");
                    }
                    _ => {
                        let topics = parse_topic_list(&rest.join(" "));
                        println!("Using {} custom topics.", topics.len());
                        request.topics = TopicSource::Custom(topics);
                    }
                }
            }
            "bank" => {
                println!("Preloaded curricula:");
                for entry in planner.bank().entries() {
                    println!(
                        "  {:<24} {:<10} {} topics",
                        entry.subject,
                        entry.grade,
                        entry.topics.len()
                    );
                }
            }
            "strategy" => match parts.next() {
                None => println!("Distribution strategy: {}", planner.strategy()),
                Some(name) => match DistributionStrategy::from_str(name) {
                    Ok(strategy) => {
                        planner.set_strategy(strategy);
                        println!("Distribution strategy set to {}.", strategy);
                    }
                    Err(e) => println!("Error: {}", e),
                },
            },
            "form" => print_form(&request, calendar_dates.as_ref(), &planner),
            "build" => {
                let Some(dates) = calendar_dates.as_ref() else {
                    println!("Please complete all required fields. (missing: calendar)");
                    continue;
                };
                match planner.build(&request, dates) {
                    Ok(plan) => {
                        println!(
                            "Curriculum generated successfully! ({} lessons for {})",
                            plan.len(),
                            plan.class_key
                        );
                        match plan.dataframe() {
                            Ok(df) => println!("{}", render_df_as_text_table(&df)),
                            Err(e) => println!("Error rendering lessons: {}", e),
                        }
                        class_subjects.insert(plan.class_key.to_string(), plan.subject.clone());
                        current_class = Some(plan.class_key.to_string());
                    }
                    Err(PlannerError::InvalidInput(message)) => println!("{}", capitalize(&message)),
                    Err(e @ PlannerError::LookupMiss { .. }) => {
                        println!("{}. Add it to the database.", capitalize(&e.to_string()))
                    }
                    Err(e) => println!("Error building curriculum: {}", e),
                }
            }
            "classes" => {
                if planner.store().is_empty() {
                    println!("No classes stored yet.");
                    continue;
                }
                for key in planner.store().class_keys() {
                    match planner.summary(key.as_str()) {
                        Ok(summary) => println!("  {} ({})", key, summary.to_cli_summary()),
                        Err(e) => println!("  {} (error: {})", key, e),
                    }
                }
            }
            "use" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    println!("Usage: use <class key...>");
                    continue;
                }
                let key = rest.join(" ");
                if planner.store().lessons(&key).is_some() {
                    println!("Selected class {}.", key);
                    current_class = Some(key);
                } else {
                    println!("No lessons stored for class '{}'.", key);
                }
            }
            "show" => match current_class.as_deref().map(|key| planner.lessons(key)) {
                Some(Ok(lessons)) => print_lessons(lessons),
                Some(Err(e)) => println!("Error: {}", e),
                None => println!("No class selected. Use 'build' or 'use <class key>'."),
            },
            "activity" | "homework" | "notes" | "status" => {
                let Some(key) = current_class.clone() else {
                    println!("No class selected. Use 'build' or 'use <class key>'.");
                    continue;
                };
                let Some(index) = parse_index(parts.next()) else {
                    println!("Usage: {} <index> <value...>", cmd);
                    continue;
                };
                let rest: Vec<&str> = parts.collect();
                let text = rest.join(" ");
                let update = match cmd {
                    "activity" => LessonUpdate {
                        activity: Some(text),
                        ..LessonUpdate::default()
                    },
                    "homework" => LessonUpdate {
                        homework: Some(text),
                        ..LessonUpdate::default()
                    },
                    "notes" => LessonUpdate {
                        notes: Some(text),
                        ..LessonUpdate::default()
                    },
                    _ => match LessonStatus::from_str(&text) {
                        Ok(status) => LessonUpdate::status(status),
                        Err(e) => {
                            println!("Error: {}", e);
                            continue;
                        }
                    },
                };
                match planner.update_lesson(&key, index, &update) {
                    Ok(lesson) => println!(
                        "Lesson {} ({} {}) updated: {}.",
                        index,
                        lesson.date,
                        lesson.topic,
                        lesson.status
                    ),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "progress" => match current_class.as_deref().map(|key| planner.summary(key)) {
                Some(Ok(summary)) => println!("{}: {}", summary.class_key, summary.to_cli_summary()),
                Some(Err(e)) => println!("Error: {}", e),
                None => println!("No class selected. Use 'build' or 'use <class key>'."),
            },
            "export" => {
                let layout = parts.next().map(ExportLayout::from_str);
                let path = parts.next();
                let Some(key) = current_class.as_deref() else {
                    println!("No class selected. Use 'build' or 'use <class key>'.");
                    continue;
                };
                match (layout, path) {
                    (Some(Ok(layout)), Some(path)) => {
                        let subject = export_subject(key, &class_subjects, &planner);
                        let result = planner
                            .lessons(key)
                            .and_then(|lessons| {
                                save_lessons_to_csv(path, subject, lessons, layout)
                                    .map_err(PlannerError::from)
                            });
                        match result {
                            Ok(_) => println!("Curriculum exported to {}.", path),
                            Err(e) => println!("Error exporting curriculum: {}", e),
                        }
                    }
                    (Some(Err(e)), _) => println!("Error: {}", e),
                    _ => println!("Usage: export <summary|full> <path>"),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}

/// Subject for the export's `Subject` column. Built in this session, then the
/// bank, then the key minus its trailing grade.
fn export_subject<'a>(
    key: &'a str,
    class_subjects: &'a HashMap<String, String>,
    planner: &'a Planner,
) -> &'a str {
    class_subjects
        .get(key)
        .map(String::as_str)
        .or_else(|| planner.bank().subject_for_class(key))
        .or_else(|| key.rsplit_once(" - ").map(|(subject, _)| subject))
        .unwrap_or(key)
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

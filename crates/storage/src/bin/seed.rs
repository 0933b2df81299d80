use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tracker_core::model::{ColorTag, EntryDraft, EntryIdGenerator, SkillDraft};
use storage::repository::{EntryRecord, NewSkillRecord, SkillStore, Storage};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    skills: u32,
    entries: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidSkills { raw: String },
    InvalidEntries { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSkills { raw } => write!(f, "invalid --skills value: {raw}"),
            ArgsError::InvalidEntries { raw } => write!(f, "invalid --entries value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("TRACKER_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut skills = std::env::var("TRACKER_SKILLS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(3);
        let mut entries = std::env::var("TRACKER_ENTRIES")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(5);
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--skills" => {
                    let value = require_value(&mut args, "--skills")?;
                    skills = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidSkills { raw: value })?;
                }
                "--entries" => {
                    let value = require_value(&mut args, "--entries")?;
                    entries = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidEntries { raw: value })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value })?;
                    now = Some(parsed.with_timezone(&Utc));
                }
                other => return Err(ArgsError::UnknownArg(other.to_string())),
            }
        }

        Ok(Self {
            db_url,
            skills,
            entries,
            now,
        })
    }
}

const SAMPLE_SKILLS: [(&str, &str, f64, ColorTag); 5] = [
    ("Guitar", "Music", 1.0, ColorTag::Blue),
    ("Spanish", "Languages", 0.5, ColorTag::Green),
    ("Chess", "Games", 1.5, ColorTag::Purple),
    ("Running", "Fitness", 1.0, ColorTag::Red),
    ("Sketching", "Art", 0.75, ColorTag::Teal),
];

const SAMPLE_NOTES: [&str; 4] = [
    "warmup and drills",
    "worked through exercises",
    "focused practice block",
    "review of last session",
];

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse()?;
    let now = args.now.unwrap_or_else(Utc::now);

    let storage = Storage::sqlite(&args.db_url).await?;
    let id_generator = EntryIdGenerator::new();

    let mut seeded_entries = 0_u32;
    for i in 0..args.skills {
        let (name, category, target, color) = SAMPLE_SKILLS[(i as usize) % SAMPLE_SKILLS.len()];
        let mut draft = SkillDraft::new(name, category);
        draft.target_hours = target;
        draft.color = color;
        let validated = draft.validate()?;

        let skill_id = storage
            .skills
            .insert_new_skill(NewSkillRecord::from_validated(&validated))
            .await?;

        for j in 0..args.entries {
            let days_ago = i64::from(j) * 2;
            let date = (now - Duration::days(days_ago)).date_naive();
            let entry_draft = EntryDraft {
                date,
                hours: format!("{:.1}", 0.5 + f64::from(j % 4) * 0.5),
                notes: SAMPLE_NOTES[(j as usize) % SAMPLE_NOTES.len()].to_string(),
            };
            let entry = entry_draft
                .validate()?
                .assign_id(id_generator.next_id(now));
            storage
                .skills
                .append_entry(&skill_id, EntryRecord::from_entry(&entry))
                .await?;
            seeded_entries += 1;
        }
    }

    println!(
        "Seeded {} skills with {} entries into {}",
        args.skills, seeded_entries, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

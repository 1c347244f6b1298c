use crate::error::{PlannerError, PlannerResult};
use crate::persistence::PersistenceError;
use crate::store::ClassKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// One preloaded topic list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankEntry {
    pub subject: String,
    pub grade: String,
    pub topics: Vec<String>,
}

/// Preloaded curricula keyed by `(subject, grade)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurriculumBank {
    entries: BTreeMap<(String, String), Vec<String>>,
}

impl CurriculumBank {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Curricula shipped with the planner.
    pub fn builtin() -> Self {
        let mut bank = Self::empty();
        for (subject, grade, topics) in BUILTIN {
            bank.insert(*subject, *grade, topics.iter().map(|t| t.to_string()));
        }
        bank
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = BankEntry>,
    {
        let mut bank = Self::empty();
        for entry in entries {
            bank.insert(entry.subject, entry.grade, entry.topics);
        }
        bank
    }

    /// Read a JSON array of `{subject, grade, topics}` objects.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let file = File::open(path)?;
        let entries: Vec<BankEntry> = serde_json::from_reader(file)?;
        Ok(Self::from_entries(entries))
    }

    pub fn insert<I>(&mut self, subject: impl Into<String>, grade: impl Into<String>, topics: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let key = Self::key(&subject.into(), &grade.into());
        self.entries
            .insert(key, topics.into_iter().map(Into::into).collect());
    }

    /// Entries from `other` replace matching entries in `self`.
    pub fn merge(&mut self, other: CurriculumBank) {
        self.entries.extend(other.entries);
    }

    pub fn lookup(&self, subject: &str, grade: &str) -> PlannerResult<&[String]> {
        self.entries
            .get(&Self::key(subject, grade))
            .map(Vec::as_slice)
            .ok_or_else(|| PlannerError::LookupMiss {
                subject: subject.trim().to_string(),
                grade: grade.trim().to_string(),
            })
    }

    /// Subject of the bank entry whose class key is `class_key`.
    pub fn subject_for_class(&self, class_key: &str) -> Option<&str> {
        self.entries
            .keys()
            .find(|(subject, grade)| ClassKey::subject_grade(subject, grade).as_str() == class_key)
            .map(|(subject, _)| subject.as_str())
    }

    pub fn entries(&self) -> Vec<BankEntry> {
        self.entries
            .iter()
            .map(|((subject, grade), topics)| BankEntry {
                subject: subject.clone(),
                grade: grade.clone(),
                topics: topics.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(subject: &str, grade: &str) -> (String, String) {
        (subject.trim().to_string(), grade.trim().to_string())
    }
}

/// Grade labels offered by the planner form, "Grade 1" through "Grade 12".
pub fn grade_levels() -> Vec<String> {
    (1..=12).map(|n| format!("Grade {n}")).collect()
}

type BuiltinEntry = (&'static str, &'static str, &'static [&'static str]);

const BUILTIN: &[BuiltinEntry] = &[
    (
        "World History",
        "Grade 9",
        &[
            "Origins of Civilization",
            "Ancient Mesopotamia and Egypt",
            "Classical Greece and Rome",
            "Medieval Europe",
            "Islamic Caliphates",
            "Renaissance and Reformation",
            "Age of Exploration",
            "Industrial Revolution",
            "World Wars",
            "Post-Colonial Independence Movements",
        ],
    ),
    (
        "Biology",
        "Grade 10",
        &[
            "Scientific Method & Lab Safety",
            "Cell Structure and Function",
            "Genetics",
            "Evolution",
            "Ecology",
            "Human Body Systems",
        ],
    ),
    (
        "English",
        "Grade 8",
        &[
            "Short Stories",
            "Poetry and Figurative Language",
            "Drama - Shakespeare",
            "Persuasive Writing",
            "Research Project",
            "Novel Study",
        ],
    ),
    (
        "Navi: Yehoshua",
        "Grade 9",
        &[
            "Introduction to Navi & Sefer Yehoshua",
            "Crossing the Jordan",
            "Conquest of Jericho",
            "Achan and the Battle of Ai",
            "The Givonim Deception",
            "Southern Campaign",
            "Northern Campaign",
            "Division of the Land",
            "Cities of Refuge",
            "Final Address of Yehoshua",
        ],
    ),
    (
        "Navi: Shoftim",
        "Grade 9",
        &[
            "Overview of the Era of Shoftim",
            "Devorah and Barak",
            "Gideon and the Midianites",
            "Yiftach and His Vow",
            "Shimshon the Judge",
            "Tribe of Dan\u{2019}s Idolatry",
            "Pilegesh B\u{2019}Givah and Civil War",
        ],
    ),
    (
        "Navi: Shmuel I",
        "Grade 9",
        &[
            "Introduction to Sefer Shmuel",
            "Birth of Shmuel",
            "The Call of Shmuel",
            "Eli and the Ark",
            "Shaul\u{2019}s Rise as King",
            "War with Amalek",
            "David and Goliath",
            "Shaul\u{2019}s Jealousy",
            "David\u{2019}s Fugitive Years",
            "Shaul\u{2019}s Downfall",
        ],
    ),
    (
        "Navi: Shmuel II",
        "Grade 10",
        &[
            "David Becomes King",
            "Conquest of Jerusalem",
            "Uzzah and the Ark",
            "David\u{2019}s Covenant",
            "Batsheva and Uriah",
            "Nathan\u{2019}s Rebuke",
            "Amnon and Tamar",
            "Avshalom\u{2019}s Revolt",
            "Sheva ben Bichri",
            "David\u{2019}s Final Acts",
        ],
    ),
    (
        "Navi: Melachim I",
        "Grade 10",
        &[
            "Coronation of Shlomo",
            "Building the Beit Hamikdash",
            "Shlomo\u{2019}s Wisdom",
            "Downfall of Shlomo",
            "Division of the Kingdom",
            "Eliyahu HaNavi and the Drought",
            "Har HaCarmel Showdown",
            "Naboth\u{2019}s Vineyard",
            "Ahaziah and Fire from Heaven",
        ],
    ),
    (
        "Navi: Melachim II",
        "Grade 10",
        &[
            "Elisha\u{2019}s Miracles",
            "Siege of Shomron",
            "Chizkiyahu\u{2019}s Reforms",
            "Sancheriv\u{2019}s Invasion",
            "Menashe\u{2019}s Idolatry",
            "Yoshiyahu\u{2019}s Torah Discovery",
            "Destruction of the Temple",
        ],
    ),
];

//! Book catalogue and alias resolver.
//!
//! One static table describes every book the engine knows: its canonical code,
//! display names, category and aliases. The resolver is built from that table
//! once per process.
//!
//! # Resolution
//!
//! Input is normalized by stripping periods, collapsing whitespace and
//! uppercasing. Lookup tries an exact alias match first, then a match with all
//! spaces removed (`"1SAMUEL"`). An alias claimed by two different books is
//! dropped from the table, so an ambiguous name never resolves.
//!
//! # Adding a book
//!
//! Add a `BookInfo` row to `CATALOGUE` in canonical order. Numbered books list
//! their base names once; the `1`/`I`/`FIRST`-style prefixes are generated.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::value_objects::{BookCategory, BookCode, CategoryTag};

/// Static description of one book.
#[derive(Debug)]
pub struct BookInfo {
    code: &'static str,
    name: &'static str,
    abbreviation: &'static str,
    category: BookCategory,
    ordinal: Option<u8>,
    aliases: &'static [&'static str],
}

impl BookInfo {
    pub fn code(&self) -> BookCode {
        BookCode::from_catalogue(self.code)
    }

    pub fn code_str(&self) -> &'static str {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn abbreviation(&self) -> &'static str {
        self.abbreviation
    }

    pub fn category(&self) -> BookCategory {
        self.category
    }

    /// Every alias this entry answers to, already normalized.
    fn normalized_aliases(&self) -> Vec<String> {
        let mut out = vec![
            normalize_book_name(self.code),
            normalize_book_name(self.name),
            normalize_book_name(self.abbreviation),
        ];

        match self.ordinal {
            Some(n) => {
                let prefixes: &[&str] = match n {
                    1 => &["1", "I", "FIRST", "1ST"],
                    2 => &["2", "II", "SECOND", "2ND"],
                    _ => &["3", "III", "THIRD", "3RD"],
                };
                for base in self.aliases {
                    for prefix in prefixes {
                        out.push(normalize_book_name(&format!("{prefix} {base}")));
                    }
                }
            }
            None => out.extend(self.aliases.iter().map(|a| normalize_book_name(a))),
        }

        out.sort();
        out.dedup();
        out
    }
}

macro_rules! book {
    ($code:literal, $name:literal, $abbr:literal, $cat:ident, [$($alias:literal),* $(,)?]) => {
        BookInfo {
            code: $code,
            name: $name,
            abbreviation: $abbr,
            category: BookCategory::$cat,
            ordinal: None,
            aliases: &[$($alias),*],
        }
    };
    ($code:literal, $name:literal, $abbr:literal, $cat:ident, $n:literal, [$($alias:literal),* $(,)?]) => {
        BookInfo {
            code: $code,
            name: $name,
            abbreviation: $abbr,
            category: BookCategory::$cat,
            ordinal: Some($n),
            aliases: &[$($alias),*],
        }
    };
}

/// Canonical order (Catholic canon, deuterocanon in place, Greek Esther and
/// the Letter of Jeremiah as separate entries).
static CATALOGUE: &[BookInfo] = &[
    // ── Pentateuch ──────────────────────────────────────────────────────────
    book!("GEN", "Genesis", "Gen", Pentateuch, ["GN", "GE"]),
    book!("EXO", "Exodus", "Exod", Pentateuch, ["EX", "EXOD"]),
    book!("LEV", "Leviticus", "Lev", Pentateuch, ["LV", "LE"]),
    book!("NUM", "Numbers", "Num", Pentateuch, ["NM", "NB", "NUMERI"]),
    book!("DEU", "Deuteronomy", "Deut", Pentateuch, ["DT", "DEUTERONOMIUM"]),
    // ── Historical ──────────────────────────────────────────────────────────
    book!("JOS", "Joshua", "Josh", Historical, ["JOSH", "JOSUE", "IOSUE"]),
    book!("JDG", "Judges", "Judg", Historical, ["JGS", "JG", "IUDICUM", "IUDICES"]),
    book!("RUT", "Ruth", "Ruth", Historical, ["RU", "RT"]),
    book!("1SA", "1 Samuel", "1Sam", Historical, 1, ["SAMUEL", "SAM", "SA", "SM"]),
    book!("2SA", "2 Samuel", "2Sam", Historical, 2, ["SAMUEL", "SAM", "SA", "SM"]),
    book!("1KI", "1 Kings", "1Kgs", Historical, 1, ["KINGS", "KGS", "KI", "KIN"]),
    book!("2KI", "2 Kings", "2Kgs", Historical, 2, ["KINGS", "KGS", "KI", "KIN"]),
    book!("1CH", "1 Chronicles", "1Chr", Historical, 1, ["CHRONICLES", "CHRON", "CHR", "CH", "PARALIPOMENON"]),
    book!("2CH", "2 Chronicles", "2Chr", Historical, 2, ["CHRONICLES", "CHRON", "CHR", "CH", "PARALIPOMENON"]),
    book!("EZR", "Ezra", "Ezra", Historical, ["EZRA", "ESDRAS"]),
    book!("NEH", "Nehemiah", "Neh", Historical, ["NE", "NEHEMIAS"]),
    book!("TOB", "Tobit", "Tob", Historical, ["TB", "TOBIAS"]),
    book!("JDT", "Judith", "Jdt", Historical, ["JTH", "IUDITH", "IDT"]),
    book!("EST", "Esther", "Esth", Historical, ["ES", "ESTH"]),
    book!("ESG", "Esther (Greek)", "EsthGr", Historical, ["GREEK ESTHER", "ESTHER GREEK", "ADDITIONS TO ESTHER", "ADD ESTH"]),
    book!("1MA", "1 Maccabees", "1Macc", Historical, 1, ["MACCABEES", "MACC", "MAC", "MA", "MACHABAEORUM"]),
    book!("2MA", "2 Maccabees", "2Macc", Historical, 2, ["MACCABEES", "MACC", "MAC", "MA", "MACHABAEORUM"]),
    // ── Wisdom ──────────────────────────────────────────────────────────────
    book!("JOB", "Job", "Job", Wisdom, ["JB", "IOB"]),
    book!("PSA", "Psalms", "Ps", Wisdom, ["PSALM", "PSS", "PSLM", "PSALMI", "PSALMUS"]),
    book!("PRO", "Proverbs", "Prov", Wisdom, ["PRV", "PR", "PROVERBIA"]),
    book!("ECC", "Ecclesiastes", "Eccl", Wisdom, ["ECCLES", "QOHELETH", "QOH", "QO"]),
    book!("SNG", "Song of Songs", "Song", Wisdom, ["SONG OF SOLOMON", "CANTICLES", "CANTICLE OF CANTICLES", "CANTICUM CANTICORUM", "SG", "SOS", "CANT"]),
    book!("WIS", "Wisdom", "Wis", Wisdom, ["WISDOM OF SOLOMON", "WS", "SAPIENTIA", "SAP", "WISD"]),
    book!("SIR", "Sirach", "Sir", Wisdom, ["ECCLESIASTICUS", "ECCLUS", "ECCLI", "BEN SIRA"]),
    // ── Major prophets ──────────────────────────────────────────────────────
    book!("ISA", "Isaiah", "Isa", MajorProphets, ["IS", "ISAIAS"]),
    book!("JER", "Jeremiah", "Jer", MajorProphets, ["JR", "IEREMIAS", "JEREMIAS"]),
    book!("LAM", "Lamentations", "Lam", MajorProphets, ["LA", "LAMENTATIONES"]),
    book!("BAR", "Baruch", "Bar", MajorProphets, ["BA"]),
    book!("BAR_LjeInBar", "Letter of Jeremiah", "LJe", MajorProphets, ["LETTER OF JEREMIAH", "EPISTLE OF JEREMIAH", "EP JER", "EPISTOLA IEREMIAE"]),
    book!("EZK", "Ezekiel", "Ezek", MajorProphets, ["EZE", "EZ", "EZECHIEL"]),
    book!("DAN", "Daniel", "Dan", MajorProphets, ["DN", "DA"]),
    // ── Minor prophets ──────────────────────────────────────────────────────
    book!("HOS", "Hosea", "Hos", MinorProphets, ["HO", "OSEE"]),
    book!("JOL", "Joel", "Joel", MinorProphets, ["JL", "IOEL"]),
    book!("AMO", "Amos", "Amos", MinorProphets, ["AM"]),
    book!("OBA", "Obadiah", "Obad", MinorProphets, ["OB", "ABDIAS"]),
    book!("JON", "Jonah", "Jonah", MinorProphets, ["JNH", "IONAS", "JONAS"]),
    book!("MIC", "Micah", "Mic", MinorProphets, ["MI", "MICHAEA"]),
    book!("NAM", "Nahum", "Nah", MinorProphets, ["NA"]),
    book!("HAB", "Habakkuk", "Hab", MinorProphets, ["HB", "HABACUC"]),
    book!("ZEP", "Zephaniah", "Zeph", MinorProphets, ["ZP", "SOPHONIAS"]),
    book!("HAG", "Haggai", "Hag", MinorProphets, ["HG", "AGGAEUS"]),
    book!("ZEC", "Zechariah", "Zech", MinorProphets, ["ZC", "ZACHARIAS"]),
    book!("MAL", "Malachi", "Mal", MinorProphets, ["ML", "MALACHIAS"]),
    // ── Gospels ─────────────────────────────────────────────────────────────
    book!("MAT", "Matthew", "Matt", Gospels, ["MT", "MATTHAEUS"]),
    book!("MRK", "Mark", "Mark", Gospels, ["MK", "MAR", "MARCUS"]),
    book!("LUK", "Luke", "Luke", Gospels, ["LK", "LU", "LUCAS"]),
    book!("JHN", "John", "John", Gospels, ["JN", "JOH", "IOANNES"]),
    // ── Acts ────────────────────────────────────────────────────────────────
    book!("ACT", "Acts", "Acts", Acts, ["AC", "ACTS OF THE APOSTLES", "ACTUS APOSTOLORUM"]),
    // ── Pauline epistles ────────────────────────────────────────────────────
    book!("ROM", "Romans", "Rom", PaulineEpistles, ["RM", "RO"]),
    book!("1CO", "1 Corinthians", "1Cor", PaulineEpistles, 1, ["CORINTHIANS", "COR", "CO"]),
    book!("2CO", "2 Corinthians", "2Cor", PaulineEpistles, 2, ["CORINTHIANS", "COR", "CO"]),
    book!("GAL", "Galatians", "Gal", PaulineEpistles, ["GA"]),
    book!("EPH", "Ephesians", "Eph", PaulineEpistles, ["EPHES"]),
    book!("PHP", "Philippians", "Phil", PaulineEpistles, ["PHILIPPIANS", "PHLP"]),
    book!("COL", "Colossians", "Col", PaulineEpistles, ["CL"]),
    book!("1TH", "1 Thessalonians", "1Thess", PaulineEpistles, 1, ["THESSALONIANS", "THESS", "THES", "TH"]),
    book!("2TH", "2 Thessalonians", "2Thess", PaulineEpistles, 2, ["THESSALONIANS", "THESS", "THES", "TH"]),
    book!("1TI", "1 Timothy", "1Tim", PaulineEpistles, 1, ["TIMOTHY", "TIM", "TI", "TM"]),
    book!("2TI", "2 Timothy", "2Tim", PaulineEpistles, 2, ["TIMOTHY", "TIM", "TI", "TM"]),
    book!("TIT", "Titus", "Titus", PaulineEpistles, ["TT"]),
    book!("PHM", "Philemon", "Phlm", PaulineEpistles, ["PHILEM", "PHLM"]),
    book!("HEB", "Hebrews", "Heb", PaulineEpistles, ["HEBR"]),
    // ── Catholic epistles ───────────────────────────────────────────────────
    book!("JAS", "James", "Jas", CatholicEpistles, ["JAMES", "JM", "IACOBI"]),
    book!("1PE", "1 Peter", "1Pet", CatholicEpistles, 1, ["PETER", "PET", "PE", "PT", "PETRI"]),
    book!("2PE", "2 Peter", "2Pet", CatholicEpistles, 2, ["PETER", "PET", "PE", "PT", "PETRI"]),
    book!("1JN", "1 John", "1John", CatholicEpistles, 1, ["JOHN", "JN", "JHN", "IOANNIS"]),
    book!("2JN", "2 John", "2John", CatholicEpistles, 2, ["JOHN", "JN", "JHN", "IOANNIS"]),
    book!("3JN", "3 John", "3John", CatholicEpistles, 3, ["JOHN", "JN", "JHN", "IOANNIS"]),
    book!("JUD", "Jude", "Jude", CatholicEpistles, ["JD", "IUDAE"]),
    // ── Apocalypse ──────────────────────────────────────────────────────────
    book!("REV", "Revelation", "Rev", Apocalypse, ["REVELATIONS", "RV", "APOCALYPSE", "APOC", "APOCALYPSIS", "AP"]),
];

/// Lookup tables built from `CATALOGUE`. `None` marks an ambiguous alias.
struct AliasIndex {
    exact: HashMap<String, Option<usize>>,
    compact: HashMap<String, Option<usize>>,
    by_code: HashMap<&'static str, usize>,
}

static INDEX: LazyLock<AliasIndex> = LazyLock::new(|| {
    let mut exact: HashMap<String, Option<usize>> = HashMap::new();
    let mut compact: HashMap<String, Option<usize>> = HashMap::new();
    let mut by_code = HashMap::new();

    for (idx, info) in CATALOGUE.iter().enumerate() {
        by_code.insert(info.code, idx);
        for alias in info.normalized_aliases() {
            claim(&mut compact, alias.replace(' ', ""), idx);
            claim(&mut exact, alias, idx);
        }
    }

    AliasIndex {
        exact,
        compact,
        by_code,
    }
});

fn claim(map: &mut HashMap<String, Option<usize>>, alias: String, idx: usize) {
    map.entry(alias)
        .and_modify(|slot| {
            if *slot != Some(idx) {
                *slot = None;
            }
        })
        .or_insert(Some(idx));
}

/// Strip periods, collapse whitespace, uppercase.
pub fn normalize_book_name(input: &str) -> String {
    input
        .replace('.', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn lookup(input: &str) -> Option<&'static BookInfo> {
    let normalized = normalize_book_name(input);
    if normalized.is_empty() {
        return None;
    }

    let index = &*INDEX;
    let hit = match index.exact.get(&normalized) {
        Some(slot) => *slot,
        None => index
            .compact
            .get(&normalized.replace(' ', ""))
            .copied()
            .flatten(),
    };

    hit.map(|idx| &CATALOGUE[idx])
}

/// Resolve a book name or abbreviation to its canonical code.
///
/// Returns `None` for unknown and ambiguous names; the resolver never guesses.
pub fn resolve_book_code(input: &str) -> Option<BookCode> {
    lookup(input).map(BookInfo::code)
}

/// Catalogue entry for a canonical code.
pub fn book_info(code: &BookCode) -> Option<&'static BookInfo> {
    INDEX
        .by_code
        .get(code.as_str())
        .map(|&idx| &CATALOGUE[idx])
}

/// Position of a book in canonical order, if it is in the catalogue.
pub fn canonical_position(code: &BookCode) -> Option<usize> {
    INDEX.by_code.get(code.as_str()).copied()
}

/// Every catalogued book in canonical order.
pub fn all_books() -> impl Iterator<Item = &'static BookInfo> {
    CATALOGUE.iter()
}

/// Codes of every catalogued book inside a category or testament.
pub fn books_in(tag: CategoryTag) -> Vec<BookCode> {
    CATALOGUE
        .iter()
        .filter(|info| tag.contains(info.category))
        .map(BookInfo::code)
        .collect()
}

/// Sort codes into canonical order; unknown codes go last, alphabetically.
pub fn sort_canonical(codes: &mut [BookCode]) {
    codes.sort_by(|a, b| {
        let pa = canonical_position(a).unwrap_or(usize::MAX);
        let pb = canonical_position(b).unwrap_or(usize::MAX);
        pa.cmp(&pb).then_with(|| a.cmp(b))
    });
}

//! Surah catalog: the 114 chapters, bundled with the binary.
//!
//! Ids are positional (1..=114) and never change at runtime.

use std::fmt;

/// A surah number, 1-based.
pub type SurahId = u16;

pub const FIRST_SURAH: SurahId = 1;
pub const LAST_SURAH: SurahId = 114;

/// Where a surah was revealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevelationPlace {
    Mecca,
    Madina,
}

impl RevelationPlace {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevelationPlace::Mecca => "Mecca",
            RevelationPlace::Madina => "Madina",
        }
    }
}

impl fmt::Display for RevelationPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static summary shown in the surah list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurahSummary {
    pub id: SurahId,
    pub name: &'static str,
    pub name_arabic: &'static str,
    pub name_translation: &'static str,
    pub total_ayah: u16,
    pub revelation_place: RevelationPlace,
}

const fn surah(
    id: SurahId,
    name: &'static str,
    name_arabic: &'static str,
    name_translation: &'static str,
    total_ayah: u16,
    revelation_place: RevelationPlace,
) -> SurahSummary {
    SurahSummary { id, name, name_arabic, name_translation, total_ayah, revelation_place }
}

/// The full catalog in surah order.
pub fn catalog() -> &'static [SurahSummary] {
    &CATALOG
}

/// Look up a surah by id.
pub fn surah_by_id(id: SurahId) -> Option<&'static SurahSummary> {
    if is_valid_id(id) {
        CATALOG.get(usize::from(id) - 1)
    } else {
        None
    }
}

pub fn is_valid_id(id: SurahId) -> bool {
    (FIRST_SURAH..=LAST_SURAH).contains(&id)
}

/// Next surah, stopping at the last one.
pub fn next_id(id: SurahId) -> SurahId {
    id.saturating_add(1).clamp(FIRST_SURAH, LAST_SURAH)
}

/// Previous surah, stopping at the first one.
pub fn prev_id(id: SurahId) -> SurahId {
    id.saturating_sub(1).clamp(FIRST_SURAH, LAST_SURAH)
}

/// Al-Fatiha carries the Bismillah as its first verse and At-Tawbah has none.
pub fn shows_bismillah(id: SurahId) -> bool {
    id != 1 && id != 9
}

pub const BISMILLAH: &str = "بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ";

use self::RevelationPlace::{Madina, Mecca};

static CATALOG: [SurahSummary; LAST_SURAH as usize] = [
    surah(1, "Al-Fatiha", "الفاتحة", "The Opener", 7, Mecca),
    surah(2, "Al-Baqarah", "البقرة", "The Cow", 286, Madina),
    surah(3, "Aal-i-Imran", "آل عمران", "Family of Imran", 200, Madina),
    surah(4, "An-Nisa", "النساء", "The Women", 176, Madina),
    surah(5, "Al-Ma'idah", "المائدة", "The Table Spread", 120, Madina),
    surah(6, "Al-An'am", "الأنعام", "The Cattle", 165, Mecca),
    surah(7, "Al-A'raf", "الأعراف", "The Heights", 206, Mecca),
    surah(8, "Al-Anfal", "الأنفال", "The Spoils of War", 75, Madina),
    surah(9, "At-Tawbah", "التوبة", "The Repentance", 129, Madina),
    surah(10, "Yunus", "يونس", "Jonah", 109, Mecca),
    surah(11, "Hud", "هود", "Hud", 123, Mecca),
    surah(12, "Yusuf", "يوسف", "Joseph", 111, Mecca),
    surah(13, "Ar-Ra'd", "الرعد", "The Thunder", 43, Madina),
    surah(14, "Ibrahim", "إبراهيم", "Abraham", 52, Mecca),
    surah(15, "Al-Hijr", "الحجر", "The Rocky Tract", 99, Mecca),
    surah(16, "An-Nahl", "النحل", "The Bee", 128, Mecca),
    surah(17, "Al-Isra", "الإسراء", "The Night Journey", 111, Mecca),
    surah(18, "Al-Kahf", "الكهف", "The Cave", 110, Mecca),
    surah(19, "Maryam", "مريم", "Mary", 98, Mecca),
    surah(20, "Ta-Ha", "طه", "Ta-Ha", 135, Mecca),
    surah(21, "Al-Anbiya", "الأنبياء", "The Prophets", 112, Mecca),
    surah(22, "Al-Hajj", "الحج", "The Pilgrimage", 78, Madina),
    surah(23, "Al-Mu'minun", "المؤمنون", "The Believers", 118, Mecca),
    surah(24, "An-Nur", "النور", "The Light", 64, Madina),
    surah(25, "Al-Furqan", "الفرقان", "The Criterion", 77, Mecca),
    surah(26, "Ash-Shu'ara", "الشعراء", "The Poets", 227, Mecca),
    surah(27, "An-Naml", "النمل", "The Ant", 93, Mecca),
    surah(28, "Al-Qasas", "القصص", "The Stories", 88, Mecca),
    surah(29, "Al-Ankabut", "العنكبوت", "The Spider", 69, Mecca),
    surah(30, "Ar-Rum", "الروم", "The Romans", 60, Mecca),
    surah(31, "Luqman", "لقمان", "Luqman", 34, Mecca),
    surah(32, "As-Sajdah", "السجدة", "The Prostration", 30, Mecca),
    surah(33, "Al-Ahzab", "الأحزاب", "The Combined Forces", 73, Madina),
    surah(34, "Saba", "سبأ", "Sheba", 54, Mecca),
    surah(35, "Fatir", "فاطر", "Originator", 45, Mecca),
    surah(36, "Ya-Sin", "يس", "Ya Sin", 83, Mecca),
    surah(37, "As-Saffat", "الصافات", "Those Who Set The Ranks", 182, Mecca),
    surah(38, "Sad", "ص", "The Letter Saad", 88, Mecca),
    surah(39, "Az-Zumar", "الزمر", "The Troops", 75, Mecca),
    surah(40, "Ghafir", "غافر", "The Forgiver", 85, Mecca),
    surah(41, "Fussilat", "فصلت", "Explained in Detail", 54, Mecca),
    surah(42, "Ash-Shura", "الشورى", "The Consultation", 53, Mecca),
    surah(43, "Az-Zukhruf", "الزخرف", "The Ornaments of Gold", 89, Mecca),
    surah(44, "Ad-Dukhan", "الدخان", "The Smoke", 59, Mecca),
    surah(45, "Al-Jathiyah", "الجاثية", "The Crouching", 37, Mecca),
    surah(46, "Al-Ahqaf", "الأحقاف", "The Wind-Curved Sandhills", 35, Mecca),
    surah(47, "Muhammad", "محمد", "Muhammad", 38, Madina),
    surah(48, "Al-Fath", "الفتح", "The Victory", 29, Madina),
    surah(49, "Al-Hujurat", "الحجرات", "The Rooms", 18, Madina),
    surah(50, "Qaf", "ق", "The Letter Qaf", 45, Mecca),
    surah(51, "Adh-Dhariyat", "الذاريات", "The Winnowing Winds", 60, Mecca),
    surah(52, "At-Tur", "الطور", "The Mount", 49, Mecca),
    surah(53, "An-Najm", "النجم", "The Star", 62, Mecca),
    surah(54, "Al-Qamar", "القمر", "The Moon", 55, Mecca),
    surah(55, "Ar-Rahman", "الرحمن", "The Beneficent", 78, Madina),
    surah(56, "Al-Waqi'ah", "الواقعة", "The Inevitable", 96, Mecca),
    surah(57, "Al-Hadid", "الحديد", "The Iron", 29, Madina),
    surah(58, "Al-Mujadila", "المجادلة", "The Pleading Woman", 22, Madina),
    surah(59, "Al-Hashr", "الحشر", "The Exile", 24, Madina),
    surah(60, "Al-Mumtahanah", "الممتحنة", "She That Is To Be Examined", 13, Madina),
    surah(61, "As-Saff", "الصف", "The Ranks", 14, Madina),
    surah(62, "Al-Jumu'ah", "الجمعة", "The Congregation", 11, Madina),
    surah(63, "Al-Munafiqun", "المنافقون", "The Hypocrites", 11, Madina),
    surah(64, "At-Taghabun", "التغابن", "The Mutual Disillusion", 18, Madina),
    surah(65, "At-Talaq", "الطلاق", "The Divorce", 12, Madina),
    surah(66, "At-Tahrim", "التحريم", "The Prohibition", 12, Madina),
    surah(67, "Al-Mulk", "الملك", "The Sovereignty", 30, Mecca),
    surah(68, "Al-Qalam", "القلم", "The Pen", 52, Mecca),
    surah(69, "Al-Haqqah", "الحاقة", "The Reality", 52, Mecca),
    surah(70, "Al-Ma'arij", "المعارج", "The Ascending Stairways", 44, Mecca),
    surah(71, "Nuh", "نوح", "Noah", 28, Mecca),
    surah(72, "Al-Jinn", "الجن", "The Jinn", 28, Mecca),
    surah(73, "Al-Muzzammil", "المزمل", "The Enshrouded One", 20, Mecca),
    surah(74, "Al-Muddaththir", "المدثر", "The Cloaked One", 56, Mecca),
    surah(75, "Al-Qiyamah", "القيامة", "The Resurrection", 40, Mecca),
    surah(76, "Al-Insan", "الإنسان", "The Man", 31, Madina),
    surah(77, "Al-Mursalat", "المرسلات", "The Emissaries", 50, Mecca),
    surah(78, "An-Naba", "النبأ", "The Tidings", 40, Mecca),
    surah(79, "An-Nazi'at", "النازعات", "Those Who Drag Forth", 46, Mecca),
    surah(80, "Abasa", "عبس", "He Frowned", 42, Mecca),
    surah(81, "At-Takwir", "التكوير", "The Overthrowing", 29, Mecca),
    surah(82, "Al-Infitar", "الانفطار", "The Cleaving", 19, Mecca),
    surah(83, "Al-Mutaffifin", "المطففين", "The Defrauding", 36, Mecca),
    surah(84, "Al-Inshiqaq", "الانشقاق", "The Sundering", 25, Mecca),
    surah(85, "Al-Buruj", "البروج", "The Mansions of the Stars", 22, Mecca),
    surah(86, "At-Tariq", "الطارق", "The Nightcommer", 17, Mecca),
    surah(87, "Al-A'la", "الأعلى", "The Most High", 19, Mecca),
    surah(88, "Al-Ghashiyah", "الغاشية", "The Overwhelming", 26, Mecca),
    surah(89, "Al-Fajr", "الفجر", "The Dawn", 30, Mecca),
    surah(90, "Al-Balad", "البلد", "The City", 20, Mecca),
    surah(91, "Ash-Shams", "الشمس", "The Sun", 15, Mecca),
    surah(92, "Al-Layl", "الليل", "The Night", 21, Mecca),
    surah(93, "Ad-Duha", "الضحى", "The Morning Hours", 11, Mecca),
    surah(94, "Ash-Sharh", "الشرح", "The Relief", 8, Mecca),
    surah(95, "At-Tin", "التين", "The Fig", 8, Mecca),
    surah(96, "Al-Alaq", "العلق", "The Clot", 19, Mecca),
    surah(97, "Al-Qadr", "القدر", "The Power", 5, Mecca),
    surah(98, "Al-Bayyinah", "البينة", "The Clear Proof", 8, Madina),
    surah(99, "Az-Zalzalah", "الزلزلة", "The Earthquake", 8, Madina),
    surah(100, "Al-Adiyat", "العاديات", "The Courser", 11, Mecca),
    surah(101, "Al-Qari'ah", "القارعة", "The Calamity", 11, Mecca),
    surah(102, "At-Takathur", "التكاثر", "The Rivalry in World Increase", 8, Mecca),
    surah(103, "Al-Asr", "العصر", "The Declining Day", 3, Mecca),
    surah(104, "Al-Humazah", "الهمزة", "The Traducer", 9, Mecca),
    surah(105, "Al-Fil", "الفيل", "The Elephant", 5, Mecca),
    surah(106, "Quraysh", "قريش", "Quraysh", 4, Mecca),
    surah(107, "Al-Ma'un", "الماعون", "The Small Kindnesses", 7, Mecca),
    surah(108, "Al-Kawthar", "الكوثر", "The Abundance", 3, Mecca),
    surah(109, "Al-Kafirun", "الكافرون", "The Disbelievers", 6, Mecca),
    surah(110, "An-Nasr", "النصر", "The Divine Support", 3, Madina),
    surah(111, "Al-Masad", "المسد", "The Palm Fiber", 5, Mecca),
    surah(112, "Al-Ikhlas", "الإخلاص", "The Sincerity", 4, Mecca),
    surah(113, "Al-Falaq", "الفلق", "The Daybreak", 5, Mecca),
    surah(114, "An-Nas", "الناس", "Mankind", 6, Mecca),
];

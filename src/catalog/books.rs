//! Static book table in canonical order

use crate::catalog::{BookInfo, Testament};

const fn ot(code: &'static str, name: &'static str, abbrev: &'static str, chapters: u32) -> BookInfo {
    BookInfo {
        code,
        name,
        abbrev,
        testament: Testament::Old,
        chapter_count: chapters,
    }
}

const fn nt(code: &'static str, name: &'static str, abbrev: &'static str, chapters: u32) -> BookInfo {
    BookInfo {
        code,
        name,
        abbrev,
        testament: Testament::New,
        chapter_count: chapters,
    }
}

/// The 66 canonical books (39 old testament, 27 new testament)
pub(crate) static BOOKS: [BookInfo; 66] = [
    ot("gen", "창세기", "창", 50),
    ot("exo", "출애굽기", "출", 40),
    ot("lev", "레위기", "레", 27),
    ot("num", "민수기", "민", 36),
    ot("deu", "신명기", "신", 34),
    ot("jos", "여호수아", "수", 24),
    ot("jdg", "사사기", "삿", 21),
    ot("rut", "룻기", "룻", 4),
    ot("1sa", "사무엘상", "삼상", 31),
    ot("2sa", "사무엘하", "삼하", 24),
    ot("1ki", "열왕기상", "왕상", 22),
    ot("2ki", "열왕기하", "왕하", 25),
    ot("1ch", "역대상", "대상", 29),
    ot("2ch", "역대하", "대하", 36),
    ot("ezr", "에스라", "스", 10),
    ot("neh", "느헤미야", "느", 13),
    ot("est", "에스더", "에", 10),
    ot("job", "욥기", "욥", 42),
    ot("psa", "시편", "시", 150),
    ot("pro", "잠언", "잠", 31),
    ot("ecc", "전도서", "전", 12),
    ot("sng", "아가", "아", 8),
    ot("isa", "이사야", "사", 66),
    ot("jer", "예레미야", "렘", 52),
    ot("lam", "예레미야애가", "애", 5),
    ot("ezk", "에스겔", "겔", 48),
    ot("dan", "다니엘", "단", 12),
    ot("hos", "호세아", "호", 14),
    ot("jol", "요엘", "욜", 3),
    ot("amo", "아모스", "암", 9),
    ot("oba", "오바댜", "옵", 1),
    ot("jnh", "요나", "욘", 4),
    ot("mic", "미가", "미", 7),
    ot("nam", "나훔", "나", 3),
    ot("hab", "하박국", "합", 3),
    ot("zep", "스바냐", "습", 3),
    ot("hag", "학개", "학", 2),
    ot("zec", "스가랴", "슥", 14),
    ot("mal", "말라기", "말", 4),
    nt("mat", "마태복음", "마", 28),
    nt("mrk", "마가복음", "막", 16),
    nt("luk", "누가복음", "눅", 24),
    nt("jhn", "요한복음", "요", 21),
    nt("act", "사도행전", "행", 28),
    nt("rom", "로마서", "롬", 16),
    nt("1co", "고린도전서", "고전", 16),
    nt("2co", "고린도후서", "고후", 13),
    nt("gal", "갈라디아서", "갈", 6),
    nt("eph", "에베소서", "엡", 6),
    nt("php", "빌립보서", "빌", 4),
    nt("col", "골로새서", "골", 4),
    nt("1th", "데살로니가전서", "살전", 5),
    nt("2th", "데살로니가후서", "살후", 3),
    nt("1ti", "디모데전서", "딤전", 6),
    nt("2ti", "디모데후서", "딤후", 4),
    nt("tit", "디도서", "딛", 3),
    nt("phm", "빌레몬서", "몬", 1),
    nt("heb", "히브리서", "히", 13),
    nt("jas", "야고보서", "약", 5),
    nt("1pe", "베드로전서", "벧전", 5),
    nt("2pe", "베드로후서", "벧후", 3),
    nt("1jn", "요한1서", "요일", 5),
    nt("2jn", "요한2서", "요이", 1),
    nt("3jn", "요한3서", "요삼", 1),
    nt("jud", "유다서", "유", 1),
    nt("rev", "요한계시록", "계", 22),
];

//! Example pages used across the integration tests.

use officedj_spec::Genre;

/// One page's explanation text and path.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub text: &'static str,
    pub path: &'static str,
    /// Genre the path forces, if any.
    pub genre: Option<Genre>,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "bright_techno",
        text: "LED 조명 7개 설치",
        path: "/jiwon",
        genre: Some(Genre::BerlinTechno),
    },
    Scenario {
        name: "calm_moist",
        text: "빈 책상과 휴식 공간, 여유 있게 편하게 쉬는 기간",
        path: "/chaebin",
        genre: Some(Genre::BerlinTechnoMoist),
    },
    Scenario {
        name: "pop",
        text: "밝은 화이트 톤의 깔끔한 작업실<br/>2024년 리모델링",
        path: "/yeju",
        genre: Some(Genre::CuteJpop),
    },
    Scenario {
        name: "house",
        text: "주말마다 음악을 틀어두는 라운지",
        path: "/jasang",
        genre: Some(Genre::PeggyHouse),
    },
    Scenario {
        name: "rock",
        text: "회의실 3개, 전화 부스 2개",
        path: "/jungah",
        genre: Some(Genre::ArenaRock),
    },
    Scenario {
        name: "indie",
        text: "창가 자리에서 그림을 그립니다",
        path: "/seowoo",
        genre: Some(Genre::AltIndieTeen),
    },
    Scenario {
        name: "unknown_path",
        text: "Quiet corner desk with plants and a lamp",
        path: "/about",
        genre: None,
    },
    Scenario {
        name: "empty",
        text: "",
        path: "",
        genre: None,
    },
];

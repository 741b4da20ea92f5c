//! Display text: the illustrative code block, summary, and detail lines.

use std::fmt::Write as _;

use officedj_spec::{Blueprint, Density, Mode, Profile};

use crate::blueprint::patterns::step_string;

/// Shown when no display name is available.
pub const FALLBACK_NAME: &str = "누군가";

/// Renders the code block shown beside the player.
///
/// # Arguments
/// * `profile` - The derived profile
/// * `blueprint` - The blueprint built from it
/// * `display_name` - Page owner's name; blank or `None` falls back to "누군가"
///
/// # Returns
/// * A deterministic, multi-line string
pub fn render_code(profile: &Profile, blueprint: &Blueprint, display_name: Option<&str>) -> String {
    let name = display_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(FALLBACK_NAME);

    let words = serde_json::to_string_pretty(&profile.words).unwrap_or_else(|_| "[]".to_string());

    let pad = blueprint
        .pad
        .events
        .iter()
        .flatten()
        .next()
        .map(|chord| {
            let names: Vec<String> = chord.notes().iter().map(|n| format!("'{}'", n)).collect();
            format!("[{}]", names.join(", "))
        })
        .unwrap_or_else(|| "null".to_string());

    let lead = match &blueprint.lead {
        Some(line) => format!("'{} steps @ {}'", line.events.len(), line.subdivision),
        None => "'none'".to_string(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "// --- OFFICE DJ ---");
    let _ = writeln!(out, "// {}의 작업 음악", name);
    let _ = writeln!(out);
    let _ = writeln!(out, "const WORDS = {};", words);
    let _ = writeln!(out);
    let _ = writeln!(out, "const PROFILE = {{");
    let _ = writeln!(out, "  bpm: {},", profile.bpm);
    let _ = writeln!(out, "  mode: '{}',", profile.mode);
    let _ = writeln!(out, "  density: '{}',", profile.density);
    let _ = writeln!(out, "  root: '{}',", profile.scale_root);
    let _ = writeln!(out, "  vibe: '{}',", profile.vibe);
    let _ = writeln!(out, "  genre: '{}'", profile.genre);
    let _ = writeln!(out, "}};");
    let _ = writeln!(out);
    let _ = writeln!(out, "const PATTERN = {{");
    let _ = writeln!(out, "  kick: '{}',", step_string(&blueprint.drums.kick));
    let _ = writeln!(out, "  snare: '{}',", step_string(&blueprint.drums.snare));
    let _ = writeln!(out, "  hat: '{}',", step_string(&blueprint.drums.hat));
    let _ = writeln!(out, "  openHat: '{}',", step_string(&blueprint.drums.open_hat));
    let _ = writeln!(out, "  pad: {},", pad);
    let _ = writeln!(out, "  lead: {}", lead);
    let _ = writeln!(out, "}};");
    let _ = writeln!(out);
    let _ = writeln!(out, "Tone.Transport.bpm.value = PROFILE.bpm;");
    let _ = writeln!(out, "Tone.Transport.swing = {};", profile.swing);
    out
}

/// One-line Korean summary of what the loop is built from.
pub fn render_summary(profile: &Profile) -> String {
    let clue = if profile.evidence.brightness_hits > 0 {
        "밝은 조명"
    } else {
        "차분한 공간"
    };
    let mode = match profile.mode {
        Mode::Major => "메이저",
        Mode::Minor => "마이너",
    };
    format!(
        "{}개의 수치와 {} 단서를 바탕으로 {}BPM {} 루프를 구성합니다.",
        profile.evidence.number_count, clue, profile.bpm, mode
    )
}

/// Density, mode, and keyword count on one line.
pub fn render_details(profile: &Profile) -> String {
    let density = match profile.density {
        Density::Dense => "고밀도 리듬",
        Density::Steady => "표준 펄스",
        Density::Airy => "여유로운 루프",
    };
    format!(
        "Density · {} / Mode · {} / Keywords {}",
        density,
        profile.mode.as_str().to_uppercase(),
        profile.words.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::build_blueprint;
    use officedj_spec::{Evidence, Genre, PitchClass, Vibe};
    use pretty_assertions::assert_eq;

    fn profile() -> Profile {
        Profile {
            seed: 3,
            generation: 0,
            genre: Genre::ArenaRock,
            bpm: 140,
            mode: Mode::Major,
            density: Density::Steady,
            swing: 0.0,
            scale_root: PitchClass::G,
            vibe: Vibe::Bright,
            words: vec!["LED".to_string(), "조명".to_string()],
            evidence: Evidence {
                brightness_hits: 2,
                calm_hits: 0,
                number_count: 1,
                word_count: 2,
            },
        }
    }

    #[test]
    fn test_render_code_header_and_fallback_name() {
        let p = profile();
        let bp = build_blueprint(&p);
        let code = render_code(&p, &bp, None);
        let mut lines = code.lines();
        assert_eq!(lines.next(), Some("// --- OFFICE DJ ---"));
        assert_eq!(lines.next(), Some("// 누군가의 작업 음악"));
        assert_eq!(render_code(&p, &bp, Some("  ")), code);
        assert!(render_code(&p, &bp, Some("지원")).contains("// 지원의 작업 음악"));
    }

    #[test]
    fn test_render_code_contents() {
        let p = profile();
        let bp = build_blueprint(&p);
        let code = render_code(&p, &bp, Some("정아"));
        assert!(code.contains("const WORDS = [\n  \"LED\",\n  \"조명\"\n];"));
        assert!(code.contains("  bpm: 140,"));
        assert!(code.contains("  root: 'G',"));
        assert!(code.contains("  genre: 'arenaRock'"));
        assert!(code.contains("  kick: 'x.......x.......',"));
        assert!(code.contains("  pad: ['G4', 'B4', 'D5', 'F#5'],"));
        assert!(code.contains("  lead: 'none'"));
        assert!(code.ends_with("Tone.Transport.swing = 0;\n"));
    }

    #[test]
    fn test_render_code_empty_words() {
        let mut p = profile();
        p.words.clear();
        let code = render_code(&p, &build_blueprint(&p), None);
        assert!(code.contains("const WORDS = [];"));
    }

    #[test]
    fn test_render_code_is_deterministic() {
        let p = profile();
        let bp = build_blueprint(&p);
        assert_eq!(render_code(&p, &bp, None), render_code(&p, &bp, None));
    }

    #[test]
    fn test_summary_and_details() {
        let p = profile();
        assert_eq!(
            render_summary(&p),
            "1개의 수치와 밝은 조명 단서를 바탕으로 140BPM 메이저 루프를 구성합니다."
        );
        assert_eq!(render_details(&p), "Density · 표준 펄스 / Mode · MAJOR / Keywords 2");

        let mut calm = p.clone();
        calm.evidence.brightness_hits = 0;
        calm.mode = Mode::Minor;
        calm.density = Density::Airy;
        assert!(render_summary(&calm).contains("차분한 공간"));
        assert!(render_summary(&calm).contains("마이너"));
        assert!(render_details(&calm).starts_with("Density · 여유로운 루프"));
    }
}

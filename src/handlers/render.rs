use std::fmt::Write;

use crate::{
    handlers::commands::option_letter,
    models::{
        domain::CertificationSummary,
        dto::{
            request::ModeDefaults,
            response::{PageReport, PageView, QuestionDetail, QuestionView, SummaryReport},
        },
    },
    services::{
        scoring::{BandTier, QuestionStatus},
        session_timer::TimerTick,
    },
};

// `write!` into a String cannot fail, so its results are discarded below.

fn status_mark(status: QuestionStatus) -> &'static str {
    match status {
        QuestionStatus::Correct => "✓",
        QuestionStatus::Incorrect => "✗",
        QuestionStatus::Unanswered => "·",
    }
}

fn tier_label(tier: BandTier) -> &'static str {
    match tier {
        BandTier::Excellent => "excellent",
        BandTier::Good => "good",
        BandTier::Poor => "needs work",
    }
}

fn pass_label(passed: bool) -> &'static str {
    if passed {
        "PASS"
    } else {
        "FAIL"
    }
}

pub fn certification_list(certifications: &[CertificationSummary]) -> String {
    if certifications.is_empty() {
        return "No certifications found.".to_string();
    }

    let width = certifications.iter().map(|c| c.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for cert in certifications {
        let _ = writeln!(
            out,
            "{:<width$}  {} ({} questions)",
            cert.id,
            cert.name,
            cert.question_count,
            width = width
        );
    }
    out.trim_end().to_string()
}

pub fn mode_defaults(name: &str, defaults: &ModeDefaults) -> String {
    let limit = match defaults.time_limit.as_seconds() {
        Some(_) => format!(
            "{}h {}m",
            defaults.time_limit.hours, defaults.time_limit.minutes
        ),
        None => "none".to_string(),
    };
    format!(
        "{}: full = {} questions, random default = {} questions, suggested limit {}",
        name, defaults.full_question_count, defaults.random_question_count, limit
    )
}

fn question_block(out: &mut String, view: &QuestionView<'_>) {
    let question = view.question;
    let mut header = format!("{}. {}", view.number, question.text);
    if question.is_multi_answer() {
        let _ = write!(header, " (choose {})", question.correct.len());
    }
    if let Some(status) = view.status {
        let _ = write!(header, "  [{}]", status_mark(status));
    }
    let _ = writeln!(out, "{}", header);

    for (position, option) in question.options.iter().enumerate() {
        let selected = view.selected.contains(&option.id);
        let box_mark = match (question.is_multi_answer(), selected) {
            (true, true) => "[x]",
            (true, false) => "[ ]",
            (false, true) => "(•)",
            (false, false) => "( )",
        };
        let key = if view.revealed && question.is_correct_option(&option.id) {
            "  ← correct"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "   {} {}) {}{}",
            box_mark,
            option_letter(position),
            option.text,
            key
        );
    }

    if view.revealed && !question.explanation.is_empty() {
        let _ = writeln!(out, "   Explanation: {}", question.explanation);
    }
}

pub fn page(view: &PageView<'_>, clock: Option<&TimerTick>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.title);
    let _ = write!(
        out,
        "Questions {}-{} of {} | page {}/{} | {} per page",
        view.first_number,
        view.last_number,
        view.total_questions,
        view.page_index + 1,
        view.total_pages,
        view.page_size
    );
    if let Some(tick) = clock {
        let _ = write!(out, " | {}", timer_line(tick));
    }
    let _ = writeln!(out);
    let _ = writeln!(out);

    for question in &view.questions {
        question_block(&mut out, question);
        let _ = writeln!(out);
    }

    let nav = [
        (view.nav.first_enabled, "f first"),
        (view.nav.prev_enabled, "b prev"),
        (view.nav.next_enabled, "n next"),
        (view.nav.last_enabled, "l last"),
    ]
    .iter()
    .filter(|(enabled, _)| *enabled)
    .map(|(_, label)| *label)
    .collect::<Vec<_>>()
    .join(" · ");
    if !nav.is_empty() {
        let _ = writeln!(out, "[{}]", nav);
    }
    out.trim_end().to_string()
}

pub fn timer_line(tick: &TimerTick) -> String {
    let mut line = match tick.remaining_seconds {
        Some(_) => format!("time left {}", tick.display),
        None => format!("elapsed {}", tick.display),
    };
    if tick.expired {
        line.push_str(" (time is up)");
    } else if tick.warning {
        line.push_str(" (hurry up)");
    }
    line
}

pub fn page_report(report: &PageReport) -> String {
    let score = &report.score;
    format!(
        "Questions {}-{}: {} of {} answered correct ({} on page), {}% {}",
        report.first_number,
        report.last_number,
        score.score,
        score.answered,
        score.total,
        score.percentage,
        pass_label(score.passed)
    )
}

pub fn summary(report: &SummaryReport) -> String {
    let mut out = String::new();
    let overall = &report.overall;

    let _ = writeln!(out, "== Results: {} ==", report.title);
    let _ = writeln!(
        out,
        "{}% ({} of {}) {}, passing score {}%",
        overall.percentage,
        overall.correct,
        overall.total,
        pass_label(overall.passed),
        report.passing_score
    );
    let _ = writeln!(
        out,
        "correct {} · incorrect {} · unanswered {}",
        overall.correct, overall.incorrect, overall.unanswered
    );

    let timing = &report.timing;
    let _ = write!(out, "Time: {}", timing.elapsed);
    if let Some(limit) = &timing.limit {
        let _ = write!(out, " of {}", limit);
    }
    if timing.exceeded {
        let _ = write!(out, " (limit exceeded)");
    }
    let _ = writeln!(out);

    if !report.bands.is_empty() {
        let _ = writeln!(out, "\nBy difficulty:");
        for band in &report.bands {
            let _ = writeln!(
                out,
                "  {:<15} {}/{} correct, {}% ({})",
                band.label,
                band.stats.correct,
                band.stats.total,
                band.percentage,
                tier_label(band.tier)
            );
        }
    }

    let assessment = &report.assessment;
    let _ = writeln!(out, "\n{} {}", assessment.icon, assessment.text);

    if !report.categories.is_empty() {
        let _ = writeln!(out, "\nBy category:");
        for category in &report.categories {
            let _ = write!(
                out,
                "  {} {}: {}/{} ({}%)",
                pass_label(category.passed),
                category.name,
                category.correct,
                category.total,
                category.percentage
            );
            if !category.description.is_empty() {
                let _ = write!(out, " - {}", category.description);
            }
            let _ = writeln!(out);
        }
    }

    let _ = writeln!(out, "\nQuestions:");
    for row in report.grid.chunks(10) {
        let cells = row
            .iter()
            .map(|cell| format!("{:>3}{}", cell.number, status_mark(cell.status)))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, " {}", cells);
    }
    let _ = writeln!(out, "\n`d <n>` for details, `back` to return, `restart` or `q`.");

    out.trim_end().to_string()
}

pub fn question_detail(detail: &QuestionDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Question {} [{}]: {}",
        detail.number,
        status_mark(detail.status),
        detail.text
    );
    for (position, option) in detail.options.iter().enumerate() {
        let marks = match (option.is_correct, option.was_selected) {
            (true, true) => "✓ your answer",
            (true, false) => "✓",
            (false, true) => "✗ your answer",
            (false, false) => "",
        };
        let _ = writeln!(
            out,
            "  {}) {} {}",
            option_letter(position),
            option.text,
            marks
        );
    }
    if !detail.explanation.is_empty() {
        let _ = writeln!(out, "Explanation: {}", detail.explanation);
    }
    out.trim_end().to_string()
}

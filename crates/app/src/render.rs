//! Plain-text views for the terminal driver.

use exam_core::catalog;
use exam_core::model::Attempt;
use exam_core::scoring::QuestionOutcome;
use exam_core::time::format_countdown;
use services::{HistoryStats, Phase, QuestionStatus, ResultSummary, SessionController};

const LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn dashboard(stats: &HistoryStats, latest: Option<&Attempt>) {
    println!();
    println!("== Dashboard ==");
    println!(
        "Tests taken: {}   Average score: {}%   Study time: {}m",
        stats.tests_taken, stats.average_percentage, stats.study_minutes
    );
    if let Some(attempt) = latest {
        println!(
            "Last: {} ({}%) on {}",
            attempt.exam_title(),
            attempt.percentage(),
            attempt.display_date()
        );
    }
    catalog_list();
    println!("Commands: start <id>, generate <topic>, history [id], help, quit");
}

pub fn catalog_list() {
    for exam in catalog::builtin_exams() {
        println!(
            "  [{}] {} ({}, {}, {} questions, {} min)",
            exam.id,
            exam.title,
            exam.category,
            exam.difficulty.as_str(),
            exam.total_questions,
            exam.duration_minutes
        );
    }
}

pub fn history(attempts: &[Attempt]) {
    if attempts.is_empty() {
        println!("No attempts yet.");
        return;
    }
    for attempt in attempts {
        let verdict = if attempt.passed() { "pass" } else { "fail" };
        println!(
            "  {}  {:<32} {}/{} {:>3}% {} {}",
            attempt.display_date(),
            attempt.exam_title(),
            attempt.score(),
            attempt.total(),
            attempt.percentage(),
            attempt.rank(),
            verdict
        );
    }
}

pub fn question(session: &SessionController) {
    let (Some(exam), Some(index), Some(question)) = (
        session.exam(),
        session.current_index(),
        session.current_question(),
    ) else {
        return;
    };
    let selected = session.answers().and_then(|answers| answers.get(index));

    println!();
    println!(
        "{}  Question {} of {}  [{}]",
        exam.title,
        index + 1,
        exam.questions.len(),
        format_countdown(session.remaining_secs().unwrap_or_default())
    );
    println!("{}", question.text);
    for (option, text) in question.options.iter().enumerate() {
        let marker = if selected == Some(option) { '*' } else { ' ' };
        println!(" {marker}{}) {text}", LETTERS[option % LETTERS.len()]);
    }
}

pub fn status(session: &SessionController) {
    let Some(progress) = session.progress() else {
        return;
    };
    let navigator: String = session
        .navigator()
        .iter()
        .map(|status| match status {
            QuestionStatus::Current => '>',
            QuestionStatus::Answered => '#',
            QuestionStatus::NotVisited => '.',
        })
        .collect();
    println!(
        "{navigator}  answered {}/{}  unanswered {}  time left {}",
        progress.answered,
        progress.total,
        progress.unanswered,
        format_countdown(progress.remaining_secs)
    );
}

pub fn result(summary: &ResultSummary) {
    let attempt = &summary.attempt;
    let minutes = attempt.time_spent_secs() / 60;
    let seconds = attempt.time_spent_secs() % 60;
    println!();
    println!(
        "== {} ==",
        if summary.passed {
            "Exam Passed!"
        } else {
            "Keep Practicing"
        }
    );
    println!("{}", attempt.exam_title());
    println!(
        "Score: {}/{} ({}%)   Rank: {}   Time: {minutes}m {seconds}s",
        attempt.score(),
        attempt.total(),
        attempt.percentage(),
        summary.rank
    );
    println!("Commands: review, feedback, back, quit");
}

pub fn review(session: &SessionController, summary: &ResultSummary) {
    let Some(exam) = session.exam() else {
        return;
    };
    for item in &summary.review {
        let Some(question) = exam.question(item.index) else {
            continue;
        };
        let mark = match item.outcome {
            QuestionOutcome::Correct => "correct",
            QuestionOutcome::Incorrect => "incorrect",
            QuestionOutcome::Skipped => "skipped",
        };
        println!("{}. {} [{mark}]", item.index + 1, question.text);
        let option = |index: usize| question.options.get(index).map_or("?", String::as_str);
        if let Some(selected) = item.selected {
            if item.outcome != QuestionOutcome::Correct {
                println!("   yours:   {}", option(selected));
            }
        }
        println!("   answer:  {}", option(item.correct));
    }
}

pub fn help(phase: Phase) {
    let lines: &[&str] = match phase {
        Phase::Dashboard => &[
            "list               show built-in exams",
            "start <id>         start a built-in exam",
            "generate <topic>   generate an exam with the AI provider",
            "history [id]       list past attempts",
        ],
        Phase::InExam => &[
            "a-d | 1-4          answer the current question",
            "next | prev        move between questions",
            "goto <n>           jump to question n",
            "status             show progress",
            "submit             finish and score the exam",
            "abandon            leave without recording",
        ],
        Phase::Result => &[
            "review             walk through every question",
            "feedback           ask the study coach",
            "back               return to the dashboard",
        ],
    };
    for line in lines {
        println!("  {line}");
    }
    println!("  quit               exit");
}

//! Exams that ship with the application.

use crate::model::{Difficulty, Exam, ExamId, Question, QuestionId};

/// The fixed exams offered on the dashboard.
#[must_use]
pub fn builtin_exams() -> Vec<Exam> {
    vec![modern_react(), advanced_javascript()]
}

/// Look up a built-in exam by id.
#[must_use]
pub fn find(id: ExamId) -> Option<Exam> {
    builtin_exams().into_iter().find(|exam| exam.id == id)
}

fn modern_react() -> Exam {
    let questions = vec![
        Question::new(
            QuestionId::new(101),
            "What is the primary purpose of the useMemo hook?",
            [
                "To perform side effects",
                "To memoize expensive calculations",
                "To handle global state",
                "To create refs",
            ],
            1,
        ),
        Question::new(
            QuestionId::new(102),
            "In React, what does 'Lifting State Up' refer to?",
            [
                "Moving state to a lower component",
                "Syncing state between two components using their closest common ancestor",
                "Deploying the state to a cloud server",
                "Deleting state to improve performance",
            ],
            1,
        ),
        Question::new(
            QuestionId::new(103),
            "Which life-cycle equivalent does useEffect with an empty dependency array represent?",
            [
                "componentDidUpdate",
                "componentWillUnmount",
                "componentDidMount",
                "constructor",
            ],
            2,
        ),
        Question::new(
            QuestionId::new(104),
            "What is the Virtual DOM?",
            [
                "A direct copy of the HTML",
                "An in-memory representation of the real DOM",
                "A server-side rendering tool",
                "A specialized CSS parser",
            ],
            1,
        ),
        Question::new(
            QuestionId::new(105),
            "Strict Mode in React is used for:",
            [
                "Compiling TypeScript",
                "Enabling better CSS support",
                "Highlighting potential problems in an application",
                "Preventing all errors",
            ],
            2,
        ),
    ];

    Exam {
        id: ExamId::new(1),
        title: "Modern React Development".into(),
        category: "Web Engineering".into(),
        duration_minutes: 15,
        total_questions: 5,
        difficulty: Difficulty::Medium,
        questions,
    }
}

fn advanced_javascript() -> Exam {
    let questions = vec![
        Question::new(
            QuestionId::new(201),
            "What is the result of 'typeof null' in JavaScript?",
            ["'null'", "'undefined'", "'object'", "'string'"],
            2,
        ),
        Question::new(
            QuestionId::new(202),
            "Which of the following is NOT a falsy value?",
            ["0", "'' (empty string)", "NaN", "[] (empty array)"],
            3,
        ),
        Question::new(
            QuestionId::new(203),
            "What does the 'bind' method do?",
            [
                "Executes a function immediately",
                "Creates a new function with a specific 'this' context",
                "Deletes a function",
                "Parses JSON",
            ],
            1,
        ),
        Question::new(
            QuestionId::new(204),
            "Async functions always return:",
            ["An object", "A Promise", "A string", "Nothing"],
            1,
        ),
    ];

    Exam {
        id: ExamId::new(2),
        title: "Advanced JavaScript Basics".into(),
        category: "Programming".into(),
        duration_minutes: 10,
        total_questions: 4,
        difficulty: Difficulty::Hard,
        questions,
    }
}

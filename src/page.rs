//! Page sections, navigation and the text shown beside the avatar.

use crate::contact::{ContactForm, FormField, SubmissionStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Home,
    About,
    Contact,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Home, Section::About, Section::Contact];

    pub fn title(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::About => "About",
            Section::Contact => "Contact",
        }
    }

    pub fn anchor(self) -> &'static str {
        match self {
            Section::Home => "#home",
            Section::About => "#about",
            Section::Contact => "#contact",
        }
    }

    fn index(self) -> usize {
        Section::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Section {
        Section::ALL[(self.index() + 1) % Section::ALL.len()]
    }

    pub fn previous(self) -> Section {
        Section::ALL[(self.index() + Section::ALL.len() - 1) % Section::ALL.len()]
    }

    pub fn from_anchor(anchor: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.anchor() == anchor)
    }
}

/// Current section plus whether the bar should render in its condensed style
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    current: Section,
    scrolled: bool,
}

impl Navigation {
    pub fn current(&self) -> Section {
        self.current
    }

    pub fn scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn go_to(&mut self, section: Section) {
        if section != self.current {
            tracing::debug!("navigating to {}", section.anchor());
        }
        self.current = section;
        self.scrolled = section != Section::Home;
    }

    pub fn next(&mut self) {
        self.go_to(self.current.next());
    }

    pub fn previous(&mut self) {
        self.go_to(self.current.previous());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub period: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub tagline: String,
    pub location: String,
    pub email: String,
    pub skills: Vec<String>,
    pub experience: Vec<Experience>,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            name: "Your Name".into(),
            title: "Software Developer".into(),
            tagline: "I build mobile apps, web frontends and the services behind them.".into(),
            location: "Somewhere on Earth".into(),
            email: "you@example.com".into(),
            skills: ["Android", "Flutter", "React Native", "React", "Python", "Firebase"]
                .into_iter()
                .map(String::from)
                .collect(),
            experience: vec![Experience {
                role: "Software Developer".into(),
                company: "Example Corp".into(),
                period: "2022 - Current".into(),
                highlights: vec![
                    "Design, develop and maintain Android and Flutter applications".into(),
                    "Ship features across mobile and web projects".into(),
                ],
            }],
        }
    }
}

/// Greedy word wrap; words longer than `width` get their own line
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// What the contact section shows of the form
#[derive(Debug, Clone, Copy)]
pub struct ContactView<'a> {
    pub form: &'a ContactForm,
    pub status: &'a SubmissionStatus,
    /// Field receiving keystrokes, if the form is being edited
    pub focus: Option<FormField>,
}

/// Text lines for `section`, wrapped to `width` columns
pub fn render_section(section: Section, profile: &Profile, contact: &ContactView<'_>, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let para = |lines: &mut Vec<String>, text: &str| lines.extend(wrap(text, width));

    match section {
        Section::Home => {
            para(&mut lines, &format!("Hi, I'm {}", profile.name));
            para(&mut lines, &profile.title);
            lines.push(String::new());
            para(&mut lines, &profile.tagline);
            lines.push(String::new());
            para(&mut lines, &format!("Email: {}", profile.email));
            para(&mut lines, &format!("Location: {}", profile.location));
        }
        Section::About => {
            para(&mut lines, "Skills");
            para(&mut lines, &profile.skills.join(" · "));
            for job in &profile.experience {
                lines.push(String::new());
                para(&mut lines, &format!("{} @ {}", job.role, job.company));
                para(&mut lines, &job.period);
                for item in &job.highlights {
                    para(&mut lines, &format!("• {}", item));
                }
            }
        }
        Section::Contact => {
            para(&mut lines, "Get in touch");
            para(&mut lines, "Ready to collaborate? Let's discuss your next project.");
            lines.push(String::new());
            para(&mut lines, &format!("Email: {}", profile.email));
            para(&mut lines, &format!("Location: {}", profile.location));
            lines.push(String::new());
            for field in FormField::ALL {
                let marker = if contact.focus == Some(field) { '>' } else { ' ' };
                let line = format!("{} {}: {}", marker, field.label(), contact.form.field(field));
                lines.push(line.chars().take(width.max(1)).collect());
            }
            lines.push(String::new());
            if contact.focus.is_some() {
                para(&mut lines, "tab next field · enter send · esc stop editing");
            } else {
                para(&mut lines, "press e to write a message");
            }
            match contact.status {
                SubmissionStatus::Idle => {}
                SubmissionStatus::Sending => para(&mut lines, "Sending..."),
                SubmissionStatus::Success => para(&mut lines, "Message sent. Thank you!"),
                SubmissionStatus::Error(reason) => para(&mut lines, &format!("Sending failed: {}", reason)),
            }
        }
    }
    lines
}

pub fn footer_line(profile: &Profile, year: i32) -> String {
    format!(
        "© {} {} · t theme · tab sections · p pause · w wireframe · q quit",
        year, profile.name
    )
}

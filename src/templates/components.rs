use maud::{html, Markup};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::db::entities::Genres;
use crate::db::repositories::ShowEntry;
use crate::forms::{FormFields, ValidationErrors, GENRE_CHOICES, STATE_CHOICES};

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x300/1a1a1a/ffffff?text=No+Image";

const INPUT_CLASS: &str = "w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-primary";

/// e.g. `Sat Jun 01, 2024 8:00PM`
pub fn format_datetime(value: &DateTimeWithTimeZone) -> String {
    value.format("%a %b %d, %Y %-I:%M%p").to_string()
}

pub fn notification(message: &str, notification_type: &str) -> Markup {
    let (bg_color, text_color, icon) = match notification_type {
        "success" => ("bg-green-50", "text-green-800", "✓"),
        "error" => ("bg-red-50", "text-red-800", "✗"),
        "info" => ("bg-blue-50", "text-blue-800", "ℹ"),
        _ => ("bg-gray-50", "text-gray-800", "•"),
    };

    html! {
        div class={(format!("notification p-4 rounded-md mb-4 {} {}", bg_color, text_color))} {
            div class="flex items-center" {
                span class="font-bold mr-2" { (icon) }
                span { (message) }
            }
        }
    }
}

pub fn validation_summary(errors: &ValidationErrors) -> Markup {
    html! {
        div class="notification p-4 rounded-md mb-4 bg-red-50 text-red-800" {
            p class="font-semibold" { "Please fix the following:" }
            ul class="list-disc ml-6 mt-2" {
                @for message in errors.messages() {
                    li { (message) }
                }
            }
        }
    }
}

pub fn genre_tags(genres: &Genres) -> Markup {
    html! {
        div class="flex flex-wrap gap-2" {
            @for genre in genres.iter() {
                span class="genre px-2 py-1 bg-gray-100 text-gray-700 text-sm rounded" { (genre) }
            }
        }
    }
}

pub fn search_box(action: &str, placeholder: &str, term: &str) -> Markup {
    html! {
        form method="post" action=(action) class="flex gap-2" {
            input
                type="search"
                name="search_term"
                value=(term)
                placeholder=(placeholder)
                class=(INPUT_CLASS);
            button type="submit" class="px-4 py-2 bg-primary text-white font-semibold rounded-md" {
                "Search"
            }
        }
    }
}

/// A show on a detail page, linking to the counterpart at `base_path`.
pub fn show_card(show: &ShowEntry, base_path: &str) -> Markup {
    let image = show
        .counterpart_image_link
        .as_deref()
        .unwrap_or(PLACEHOLDER_IMAGE);

    html! {
        div class="show-card flex items-center gap-4 bg-white rounded-lg shadow-sm p-4" {
            img src=(image) alt=(show.counterpart_name) class="w-16 h-16 rounded object-cover" loading="lazy";
            div {
                a href={(format!("{}/{}", base_path, show.counterpart_id))} class="font-semibold text-gray-900 hover:underline" {
                    (show.counterpart_name)
                }
                p class="text-sm text-gray-600" { (format_datetime(&show.start_time)) }
            }
        }
    }
}

pub fn show_section(title: &str, shows: &[ShowEntry], base_path: &str) -> Markup {
    html! {
        section class="mt-8" {
            h2 class="text-xl font-semibold mb-4" { (shows.len()) " " (title) }
            @if shows.is_empty() {
                p class="text-gray-500" { "None yet." }
            } @else {
                div class="grid grid-cols-1 md:grid-cols-2 gap-4" {
                    @for show in shows {
                        (show_card(show, base_path))
                    }
                }
            }
        }
    }
}

pub fn text_field(fields: &FormFields, name: &str, label: &str, input_type: &str) -> Markup {
    html! {
        div {
            label for=(name) class="block text-sm font-medium text-gray-700 mb-2" { (label) }
            input
                type=(input_type)
                id=(name)
                name=(name)
                value=[fields.value(name)]
                class=(INPUT_CLASS);
        }
    }
}

pub fn state_select(fields: &FormFields) -> Markup {
    let selected = fields.value("state").map(str::to_ascii_uppercase);

    html! {
        div {
            label for="state" class="block text-sm font-medium text-gray-700 mb-2" { "State" }
            select id="state" name="state" class=(INPUT_CLASS) {
                option value="" { "Choose a state" }
                @for code in STATE_CHOICES {
                    option value=(code) selected[selected.as_deref() == Some(*code)] { (code) }
                }
            }
        }
    }
}

pub fn genres_select(fields: &FormFields) -> Markup {
    let chosen = fields.values("genres");

    html! {
        div {
            label for="genres" class="block text-sm font-medium text-gray-700 mb-2" { "Genres" }
            select id="genres" name="genres" multiple size="8" class=(INPUT_CLASS) {
                @for genre in GENRE_CHOICES {
                    option value=(genre) selected[chosen.contains(genre)] { (genre) }
                }
            }
        }
    }
}

pub fn checkbox(fields: &FormFields, name: &str, label: &str) -> Markup {
    html! {
        div class="flex items-center gap-2" {
            input type="checkbox" id=(name) name=(name) value="y" checked[fields.checked(name)];
            label for=(name) class="text-sm font-medium text-gray-700" { (label) }
        }
    }
}

pub fn submit_button(label: &str) -> Markup {
    html! {
        button type="submit" class="w-full bg-primary hover:bg-green-600 text-white font-semibold py-2 px-4 rounded-md transition" {
            (label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_format_datetime() {
        let dt = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 20, 5, 0)
            .unwrap();
        assert_eq!(format_datetime(&dt), "Sat Jun 01, 2024 8:05PM");
    }

    #[test]
    fn test_genres_select_marks_chosen() {
        let fields = FormFields::new().with("genres", "Jazz");
        let html = genres_select(&fields).into_string();

        assert!(html.contains(r#"<option value="Jazz" selected>Jazz</option>"#));
        assert!(html.contains(r#"<option value="Blues">Blues</option>"#));
    }
}

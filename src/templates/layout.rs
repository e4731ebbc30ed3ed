use maud::{html, Markup, DOCTYPE};

pub fn base_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" class="h-full" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " - Showbook" }

                script src="https://cdn.tailwindcss.com" {}
                link rel="stylesheet" href="/static/css/site.css";
            }
            body class="h-full bg-gray-50" {
                div class="min-h-full" {
                    (nav_bar())

                    main class="container mx-auto px-4 py-8" {
                        (content)
                    }

                    (footer())
                }
            }
        }
    }
}

fn nav_bar() -> Markup {
    let link = "text-gray-700 hover:text-primary px-3 py-2 rounded-md text-sm font-medium";

    html! {
        nav class="bg-white shadow-sm" {
            div class="container mx-auto px-4" {
                div class="flex justify-between items-center h-16" {
                    a href="/" class="flex items-center space-x-3" {
                        span class="text-xl font-bold text-gray-900" { "Showbook" }
                    }

                    div class="flex space-x-4" {
                        a href="/venues" class=(link) { "Venues" }
                        a href="/artists" class=(link) { "Artists" }
                        a href="/shows" class=(link) { "Shows" }
                    }
                }
            }
        }
    }
}

fn footer() -> Markup {
    html! {
        footer class="bg-white border-t border-gray-200 mt-12" {
            div class="container mx-auto px-4 py-6" {
                div class="text-center text-gray-600 text-sm" {
                    "Showbook - venues, artists and the shows that bring them together"
                }
            }
        }
    }
}

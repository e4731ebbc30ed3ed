use maud::{html, Markup};

use super::components::{
    checkbox, format_datetime, genre_tags, genres_select, notification, search_box, show_section,
    state_select, submit_button, text_field, validation_summary,
};
use super::layout::base_layout;
use crate::db::entities::{artist, venue};
use crate::db::enums::SearchKind;
use crate::db::repositories::{ArtistDetail, CityGroup, SearchResults, ShowListing, VenueDetail};
use crate::forms::{FormFields, ValidationErrors};

/// A one-off message shown above the page content, `(text, kind)`.
pub type Flash<'a> = Option<(&'a str, &'a str)>;

fn flash_area(flash: Flash<'_>) -> Markup {
    html! {
        div id="notification-area" {
            @if let Some((message, kind)) = flash {
                (notification(message, kind))
            }
        }
    }
}

pub fn home_page(flash: Flash<'_>) -> Markup {
    base_layout(
        "Home",
        html! {
            (flash_area(flash))

            div class="max-w-3xl mx-auto text-center" {
                h1 class="text-4xl font-bold text-gray-900 mb-4" { "Find your next show" }
                p class="text-gray-600 mb-8" {
                    "Browse venues and artists, or list your own."
                }

                div class="grid grid-cols-1 md:grid-cols-2 gap-6 text-left" {
                    div class="bg-white rounded-lg shadow-sm p-6" {
                        h2 class="text-lg font-semibold mb-4" { "Venues" }
                        (search_box("/venues/search", "Find a venue", ""))
                        a href="/venues/create" class="block mt-4 text-primary hover:underline" { "Post a venue" }
                    }
                    div class="bg-white rounded-lg shadow-sm p-6" {
                        h2 class="text-lg font-semibold mb-4" { "Artists" }
                        (search_box("/artists/search", "Find an artist", ""))
                        a href="/artists/create" class="block mt-4 text-primary hover:underline" { "Post an artist" }
                    }
                }

                a href="/shows/create" class="inline-block mt-8 px-4 py-2 bg-primary text-white font-semibold rounded-md" {
                    "Post a show"
                }
            }
        },
    )
}

pub fn venues_page(groups: &[CityGroup]) -> Markup {
    base_layout(
        "Venues",
        html! {
            div class="flex justify-between items-center mb-6" {
                h1 class="text-3xl font-bold text-gray-900" { "Venues" }
                (search_box("/venues/search", "Find a venue", ""))
            }

            @if groups.is_empty() {
                p class="text-gray-600 text-lg" { "No venues listed yet." }
            }

            @for group in groups {
                section class="city-group mb-8" {
                    h2 class="text-xl font-semibold mb-3" { (group.city) ", " (group.state) }
                    ul class="space-y-2" {
                        @for venue in &group.venues {
                            li class="venue" {
                                a href={(format!("/venues/{}", venue.id))} class="text-gray-900 hover:underline" {
                                    (venue.name)
                                }
                                span class="ml-2 text-sm text-gray-500" {
                                    (venue.num_upcoming_shows) " upcoming"
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn artists_page(artists: &[artist::Model]) -> Markup {
    base_layout(
        "Artists",
        html! {
            div class="flex justify-between items-center mb-6" {
                h1 class="text-3xl font-bold text-gray-900" { "Artists" }
                (search_box("/artists/search", "Find an artist", ""))
            }

            @if artists.is_empty() {
                p class="text-gray-600 text-lg" { "No artists listed yet." }
            } @else {
                ul class="space-y-2" {
                    @for artist in artists {
                        li class="artist" {
                            a href={(format!("/artists/{}", artist.id))} class="text-gray-900 hover:underline" {
                                (artist.name)
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn search_results_page(kind: SearchKind, term: &str, results: &SearchResults) -> Markup {
    let (title, action) = match kind {
        SearchKind::Venue => ("Venue search", "/venues/search"),
        SearchKind::Artist => ("Artist search", "/artists/search"),
    };

    base_layout(
        title,
        html! {
            div class="mb-6" {
                (search_box(action, "Search by name", term))
            }

            h1 class="text-2xl font-semibold mb-4" {
                "Number of search results for \"" (term) "\": "
                span class="result-count" { (results.count) }
            }

            ul class="space-y-2" {
                @for hit in &results.data {
                    li class="search-hit" {
                        a href={(format!("{}/{}", kind.base_path(), hit.id))} class="text-gray-900 hover:underline" {
                            (hit.name)
                        }
                        span class="ml-2 text-sm text-gray-500" {
                            (hit.num_upcoming_shows) " upcoming"
                        }
                    }
                }
            }
        },
    )
}

fn link_or_nothing(label: &str, href: Option<&String>) -> Markup {
    html! {
        @if let Some(href) = href {
            div {
                dt class="text-sm font-medium text-gray-500" { (label) }
                dd class="mt-1" {
                    a href=(href) target="_blank" class="text-primary hover:underline" { (href) }
                }
            }
        }
    }
}

pub fn venue_detail_page(detail: &VenueDetail, flash: Flash<'_>) -> Markup {
    let venue = &detail.venue;

    base_layout(
        &venue.name,
        html! {
            (flash_area(flash))

            div class="bg-white rounded-lg shadow-sm p-6" {
                div class="flex justify-between items-start" {
                    div {
                        h1 class="text-3xl font-bold text-gray-900" { (venue.name) }
                        p class="text-sm text-gray-500" { "ID: " (venue.id) }
                    }
                    div class="flex gap-2" {
                        a href={(format!("/venues/{}/edit", venue.id))} class="px-4 py-2 bg-blue-500 text-white font-semibold rounded-md" {
                            "Edit"
                        }
                        form method="post" action={(format!("/venues/{}/delete", venue.id))}
                             onsubmit="return confirm('Delete this venue and all of its shows?')" {
                            button type="submit" class="px-4 py-2 bg-red-500 text-white font-semibold rounded-md" {
                                "Delete"
                            }
                        }
                    }
                }

                div class="mt-4" { (genre_tags(&venue.genres)) }

                dl class="mt-6 space-y-4" {
                    div {
                        dt class="text-sm font-medium text-gray-500" { "Location" }
                        dd class="mt-1 text-gray-900" {
                            @if let Some(address) = &venue.address { (address) ", " }
                            (venue.city) ", " (venue.state)
                        }
                    }
                    @if let Some(phone) = &venue.phone {
                        div {
                            dt class="text-sm font-medium text-gray-500" { "Phone" }
                            dd class="mt-1 text-gray-900" { (phone) }
                        }
                    }
                    (link_or_nothing("Website", venue.website.as_ref()))
                    (link_or_nothing("Facebook", venue.facebook_link.as_ref()))
                }

                div class="mt-6" {
                    @if venue.seeking_talent {
                        p class="seeking font-semibold text-green-700" { "Currently seeking talent" }
                        @if let Some(description) = &venue.seeking_description {
                            p class="text-gray-700" { (description) }
                        }
                    } @else {
                        p class="text-gray-500" { "Not currently seeking talent" }
                    }
                }

                @if let Some(image) = &venue.image_link {
                    img src=(image) alt=(venue.name) class="mt-6 w-full md:w-96 rounded-lg shadow-md";
                }
            }

            (show_section("Upcoming Shows", &detail.upcoming_shows, "/artists"))
            (show_section("Past Shows", &detail.past_shows, "/artists"))
        },
    )
}

pub fn artist_detail_page(detail: &ArtistDetail, flash: Flash<'_>) -> Markup {
    let artist = &detail.artist;

    base_layout(
        &artist.name,
        html! {
            (flash_area(flash))

            div class="bg-white rounded-lg shadow-sm p-6" {
                div class="flex justify-between items-start" {
                    div {
                        h1 class="text-3xl font-bold text-gray-900" { (artist.name) }
                        p class="text-sm text-gray-500" { "ID: " (artist.id) }
                    }
                    a href={(format!("/artists/{}/edit", artist.id))} class="px-4 py-2 bg-blue-500 text-white font-semibold rounded-md" {
                        "Edit"
                    }
                }

                div class="mt-4" { (genre_tags(&artist.genres)) }

                dl class="mt-6 space-y-4" {
                    div {
                        dt class="text-sm font-medium text-gray-500" { "Location" }
                        dd class="mt-1 text-gray-900" { (artist.city) ", " (artist.state) }
                    }
                    @if let Some(phone) = &artist.phone {
                        div {
                            dt class="text-sm font-medium text-gray-500" { "Phone" }
                            dd class="mt-1 text-gray-900" { (phone) }
                        }
                    }
                    (link_or_nothing("Website", artist.website.as_ref()))
                    (link_or_nothing("Facebook", artist.facebook_link.as_ref()))
                }

                div class="mt-6" {
                    @if artist.seeking_venue {
                        p class="seeking font-semibold text-green-700" { "Currently seeking performance venues" }
                        @if let Some(description) = &artist.seeking_description {
                            p class="text-gray-700" { (description) }
                        }
                    } @else {
                        p class="text-gray-500" { "Not currently seeking performance venues" }
                    }
                }

                @if let Some(image) = &artist.image_link {
                    img src=(image) alt=(artist.name) class="mt-6 w-full md:w-96 rounded-lg shadow-md";
                }
            }

            (show_section("Upcoming Shows", &detail.upcoming_shows, "/venues"))
            (show_section("Past Shows", &detail.past_shows, "/venues"))
        },
    )
}

pub fn shows_page(shows: &[ShowListing], flash: Flash<'_>) -> Markup {
    base_layout(
        "Shows",
        html! {
            (flash_area(flash))

            div class="flex justify-between items-center mb-6" {
                h1 class="text-3xl font-bold text-gray-900" { "Shows" }
                a href="/shows/create" class="px-4 py-2 bg-primary text-white font-semibold rounded-md" { "Post a show" }
            }

            @if shows.is_empty() {
                p class="text-gray-600 text-lg" { "No shows booked yet." }
            } @else {
                div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6" {
                    @for show in shows {
                        div class="show bg-white rounded-lg shadow-sm p-4" {
                            @if let Some(image) = &show.artist_image_link {
                                img src=(image) alt=(show.artist_name) class="w-full h-48 object-cover rounded" loading="lazy";
                            }
                            p class="mt-2 text-sm text-gray-600" { (format_datetime(&show.start_time)) }
                            a href={(format!("/artists/{}", show.artist_id))} class="block font-semibold text-gray-900 hover:underline" {
                                (show.artist_name)
                            }
                            span class="text-sm text-gray-500" { "playing at " }
                            a href={(format!("/venues/{}", show.venue_id))} class="text-sm text-gray-900 hover:underline" {
                                (show.venue_name)
                            }
                        }
                    }
                }
            }
        },
    )
}

fn form_shell(title: &str, action: &str, errors: Option<&ValidationErrors>, body: Markup) -> Markup {
    base_layout(
        title,
        html! {
            div class="max-w-2xl mx-auto" {
                h1 class="text-3xl font-bold text-gray-900 mb-8" { (title) }

                @if let Some(errors) = errors {
                    (validation_summary(errors))
                }

                form method="post" action=(action) class="bg-white rounded-lg shadow-sm p-6 space-y-4" {
                    (body)
                }
            }
        },
    )
}

pub fn venue_form_page(
    title: &str,
    action: &str,
    fields: &FormFields,
    errors: Option<&ValidationErrors>,
) -> Markup {
    form_shell(
        title,
        action,
        errors,
        html! {
            (text_field(fields, "name", "Name", "text"))
            (text_field(fields, "city", "City", "text"))
            (state_select(fields))
            (text_field(fields, "address", "Address", "text"))
            (text_field(fields, "phone", "Phone", "tel"))
            (genres_select(fields))
            (text_field(fields, "image_link", "Image link", "url"))
            (text_field(fields, "facebook_link", "Facebook link", "url"))
            (text_field(fields, "website", "Website", "url"))
            (checkbox(fields, "seeking_talent", "Looking for talent"))
            (text_field(fields, "seeking_description", "Seeking description", "text"))
            (submit_button(title))
        },
    )
}

pub fn venue_edit_page(
    venue: &venue::Model,
    fields: &FormFields,
    errors: Option<&ValidationErrors>,
) -> Markup {
    venue_form_page(
        &format!("Edit venue {}", venue.name),
        &format!("/venues/{}/edit", venue.id),
        fields,
        errors,
    )
}

pub fn artist_form_page(
    title: &str,
    action: &str,
    fields: &FormFields,
    errors: Option<&ValidationErrors>,
) -> Markup {
    form_shell(
        title,
        action,
        errors,
        html! {
            (text_field(fields, "name", "Name", "text"))
            (text_field(fields, "city", "City", "text"))
            (state_select(fields))
            (text_field(fields, "phone", "Phone", "tel"))
            (genres_select(fields))
            (text_field(fields, "image_link", "Image link", "url"))
            (text_field(fields, "facebook_link", "Facebook link", "url"))
            (text_field(fields, "website", "Website", "url"))
            (checkbox(fields, "seeking_venue", "Looking for venues"))
            (text_field(fields, "seeking_description", "Seeking description", "text"))
            (submit_button(title))
        },
    )
}

pub fn artist_edit_page(
    artist: &artist::Model,
    fields: &FormFields,
    errors: Option<&ValidationErrors>,
) -> Markup {
    artist_form_page(
        &format!("Edit artist {}", artist.name),
        &format!("/artists/{}/edit", artist.id),
        fields,
        errors,
    )
}

pub fn show_form_page(
    fields: &FormFields,
    errors: Option<&ValidationErrors>,
    venues: &[venue::Model],
    artists: &[artist::Model],
) -> Markup {
    let chosen_venue = fields.value("venue_id");
    let chosen_artist = fields.value("artist_id");

    form_shell(
        "List a new show",
        "/shows/create",
        errors,
        html! {
            div {
                label for="artist_id" class="block text-sm font-medium text-gray-700 mb-2" { "Artist" }
                select id="artist_id" name="artist_id" class="w-full px-3 py-2 border border-gray-300 rounded-md" {
                    option value="" { "Choose an artist" }
                    @for artist in artists {
                        @let id = artist.id.to_string();
                        option value=(id) selected[chosen_artist == Some(id.as_str())] {
                            (artist.name) " (#" (artist.id) ")"
                        }
                    }
                }
            }
            div {
                label for="venue_id" class="block text-sm font-medium text-gray-700 mb-2" { "Venue" }
                select id="venue_id" name="venue_id" class="w-full px-3 py-2 border border-gray-300 rounded-md" {
                    option value="" { "Choose a venue" }
                    @for venue in venues {
                        @let id = venue.id.to_string();
                        option value=(id) selected[chosen_venue == Some(id.as_str())] {
                            (venue.name) " (#" (venue.id) ")"
                        }
                    }
                }
            }
            (text_field(fields, "start_time", "Start time", "datetime-local"))
            (submit_button("Create show"))
        },
    )
}

fn error_page(title: &str, heading: &str, body: Markup) -> Markup {
    base_layout(
        title,
        html! {
            div class="max-w-xl mx-auto text-center py-12" {
                h1 class="text-4xl font-bold text-gray-900 mb-4" { (heading) }
                (body)
                a href="/" class="inline-block mt-6 text-primary hover:underline" { "Back to the home page" }
            }
        },
    )
}

pub fn not_found_page() -> Markup {
    error_page(
        "Not found",
        "404",
        html! { p class="text-gray-600" { "We could not find what you were looking for." } },
    )
}

pub fn server_error_page() -> Markup {
    error_page(
        "Server error",
        "500",
        html! { p class="text-gray-600" { "Something went wrong on our side. Please try again later." } },
    )
}

pub fn bad_request_page(messages: Vec<String>) -> Markup {
    error_page(
        "Invalid request",
        "Invalid request",
        html! {
            ul class="text-red-700" {
                @for message in messages {
                    li { (message) }
                }
            }
        },
    )
}

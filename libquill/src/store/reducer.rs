//! Pure reducer for store state transitions
//!
//! `(State, Action) -> State` with no I/O. Responses for a post or topic the
//! user has navigated away from are dropped here by comparing keys.

use super::actions::Action;
use super::state::{Keyed, Loadable, State, PAGE_SIZE};
use crate::types::Post;

pub fn reduce(state: State, action: Action) -> State {
    match action {
        // === Session ===
        Action::SessionRestored(session) => State {
            session,
            session_checked: true,
            ..state
        },

        Action::LoggedIn(session) => State {
            session: Some(session),
            session_checked: true,
            ..state
        },

        Action::LoggedOut => State {
            session: None,
            user_posts: Loadable::NotAsked,
            ..state
        },

        // === Topics ===
        Action::TopicsRequested => State {
            topics: Loadable::Loading,
            ..state
        },

        Action::TopicsLoaded(topics) => State {
            topics: Loadable::Ready(topics),
            ..state
        },

        Action::TopicsFailed(error) => State {
            topics: Loadable::Failed(error),
            ..state
        },

        // === Post listing ===
        Action::PostsRequested { append } => {
            if append && state.posts.ready().is_some() {
                State {
                    loading_more: true,
                    ..state
                }
            } else {
                State {
                    posts: Loadable::Loading,
                    loading_more: false,
                    ..state
                }
            }
        }

        // A page meant to extend a listing that is no longer shown
        Action::PostsLoaded { append: true, .. } if state.posts.ready().is_none() => state,

        Action::PostsLoaded { posts, append } => {
            let has_more_posts = posts.len() >= PAGE_SIZE;
            let posts = match (append, state.posts) {
                (true, Loadable::Ready(mut existing)) => {
                    for post in posts {
                        if !existing.iter().any(|p| p.id == post.id) {
                            existing.push(post);
                        }
                    }
                    existing
                }
                _ => posts,
            };
            State {
                posts: Loadable::Ready(posts),
                loading_more: false,
                has_more_posts,
                ..state
            }
        }

        Action::PostsFailed(error) => {
            if state.loading_more {
                // Keep what is already listed
                State {
                    loading_more: false,
                    ..state
                }
            } else {
                State {
                    posts: Loadable::Failed(error),
                    ..state
                }
            }
        }

        // === Single post ===
        Action::PostRequested(id) => State {
            current_post: Some(Keyed {
                key: id,
                data: Loadable::Loading,
            }),
            ..state
        },

        Action::PostLoaded { id, post } => {
            if !is_current(&state.current_post, &id) {
                return state;
            }
            State {
                current_post: Some(Keyed {
                    key: id,
                    data: Loadable::Ready(post),
                }),
                ..state
            }
        }

        Action::PostFailed { id, error } => {
            if !is_current(&state.current_post, &id) {
                return state;
            }
            State {
                current_post: Some(Keyed {
                    key: id,
                    data: Loadable::Failed(error),
                }),
                ..state
            }
        }

        // === Topic posts ===
        Action::TopicPostsRequested(term) => State {
            topic_posts: Some(Keyed {
                key: term,
                data: Loadable::Loading,
            }),
            ..state
        },

        Action::TopicPostsLoaded { term, posts } => {
            if !is_current(&state.topic_posts, &term) {
                return state;
            }
            State {
                topic_posts: Some(Keyed {
                    key: term,
                    data: Loadable::Ready(posts),
                }),
                ..state
            }
        }

        Action::TopicPostsFailed { term, error } => {
            if !is_current(&state.topic_posts, &term) {
                return state;
            }
            State {
                topic_posts: Some(Keyed {
                    key: term,
                    data: Loadable::Failed(error),
                }),
                ..state
            }
        }

        // === User posts ===
        Action::UserPostsRequested => State {
            user_posts: Loadable::Loading,
            ..state
        },

        Action::UserPostsLoaded(posts) => State {
            user_posts: Loadable::Ready(posts),
            ..state
        },

        Action::UserPostsFailed(error) => State {
            user_posts: Loadable::Failed(error),
            ..state
        },

        // === Mutations ===
        Action::PostCreated(post) => {
            let posts = prepend(state.posts, &post);
            let user_posts = prepend(state.user_posts, &post);
            State {
                posts,
                user_posts,
                ..state
            }
        }

        Action::PostUpdated(post) => {
            let current_post = state.current_post.map(|keyed| Keyed {
                data: replace_one(keyed.data, &post),
                key: keyed.key,
            });
            let topic_posts = state.topic_posts.map(|keyed| Keyed {
                data: replace_in(keyed.data, &post),
                key: keyed.key,
            });
            State {
                posts: replace_in(state.posts, &post),
                user_posts: replace_in(state.user_posts, &post),
                current_post,
                topic_posts,
                ..state
            }
        }

        Action::PostDeleted(id) => {
            let current_post = state
                .current_post
                .filter(|keyed| keyed.data.ready().map_or(true, |post| post.id != id));
            let topic_posts = state.topic_posts.map(|keyed| Keyed {
                data: remove_from(keyed.data, id),
                key: keyed.key,
            });
            State {
                posts: remove_from(state.posts, id),
                user_posts: remove_from(state.user_posts, id),
                current_post,
                topic_posts,
                ..state
            }
        }

        // === Notifications ===
        Action::NotificationShown(notification) => State {
            notification: Some(notification),
            ..state
        },

        Action::NotificationsExpired(now) => {
            let notification = state
                .notification
                .filter(|active| !active.is_expired(now));
            State {
                notification,
                ..state
            }
        }

        Action::NotificationDismissed => State {
            notification: None,
            ..state
        },
    }
}

fn is_current<T>(slot: &Option<Keyed<T>>, key: &str) -> bool {
    slot.as_ref().is_some_and(|keyed| keyed.key == key)
}

fn prepend(list: Loadable<Vec<Post>>, post: &Post) -> Loadable<Vec<Post>> {
    match list {
        Loadable::Ready(mut posts) => {
            posts.insert(0, post.clone());
            Loadable::Ready(posts)
        }
        other => other,
    }
}

fn replace_in(list: Loadable<Vec<Post>>, post: &Post) -> Loadable<Vec<Post>> {
    match list {
        Loadable::Ready(posts) => Loadable::Ready(
            posts
                .into_iter()
                .map(|p| if p.id == post.id { post.clone() } else { p })
                .collect(),
        ),
        other => other,
    }
}

fn replace_one(data: Loadable<Post>, post: &Post) -> Loadable<Post> {
    match data {
        Loadable::Ready(existing) if existing.id == post.id => Loadable::Ready(Post {
            // List endpoints omit paragraphs; keep the ones already loaded
            paragraphs: if post.paragraphs.is_empty() {
                existing.paragraphs
            } else {
                post.paragraphs.clone()
            },
            ..post.clone()
        }),
        other => other,
    }
}

fn remove_from(list: Loadable<Vec<Post>>, id: u64) -> Loadable<Vec<Post>> {
    match list {
        Loadable::Ready(posts) => {
            Loadable::Ready(posts.into_iter().filter(|p| p.id != id).collect())
        }
        other => other,
    }
}

//! Static per-event table: which activity row, which (gated) notification and
//! which analytics event an `AppEvent` produces.
//!
//! Facet values that depend on runtime data are closures over the typed
//! payload; they receive the `NotificationContext` built by the dispatcher.

use serde_json::{json, Value};
use uuid::Uuid;

use super::context::NotificationContext;
use super::payloads::{AppEvent, FollowedUser, RecipeComment, RecipeRating, RecipeRef};
use crate::domains::activity::{ActivityType, TargetType};
use crate::domains::notifications::{NotificationPreferenceKey, NotificationType};

pub type Extractor<'a, T> = Box<dyn Fn(&NotificationContext<'_>) -> T + Send + Sync + 'a>;

pub struct ActivityFacet<'a> {
    pub activity_type: ActivityType,
    pub target_type: TargetType,
    pub target_id: Extractor<'a, Uuid>,
    pub metadata: Option<Extractor<'a, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub message: String,
}

pub struct NotificationFacet<'a> {
    pub notification_type: NotificationType,
    pub preference_key: NotificationPreferenceKey,
    pub template: Extractor<'a, NotificationContent>,
    /// Replaces the default `{actorId, ...data}` payload
    pub payload: Option<Extractor<'a, Value>>,
}

pub struct TrackingFacet<'a> {
    pub event: &'static str,
    pub properties: Option<Extractor<'a, Value>>,
}

pub struct EventDefinition<'a> {
    pub activity: ActivityFacet<'a>,
    pub notification: Option<NotificationFacet<'a>>,
    pub tracking: Option<TrackingFacet<'a>>,
}

impl<'a> EventDefinition<'a> {
    fn new(activity: ActivityFacet<'a>) -> Self {
        Self {
            activity,
            notification: None,
            tracking: None,
        }
    }

    fn notify(
        mut self,
        notification_type: NotificationType,
        preference_key: NotificationPreferenceKey,
        template: impl Fn(&NotificationContext<'_>) -> NotificationContent + Send + Sync + 'a,
    ) -> Self {
        self.notification = Some(NotificationFacet {
            notification_type,
            preference_key,
            template: Box::new(template),
            payload: None,
        });
        self
    }

    fn with_payload(
        mut self,
        payload: impl Fn(&NotificationContext<'_>) -> Value + Send + Sync + 'a,
    ) -> Self {
        if let Some(notification) = self.notification.as_mut() {
            notification.payload = Some(Box::new(payload));
        }
        self
    }

    fn track(mut self, event: &'static str, properties: Option<Value>) -> Self {
        self.tracking = Some(TrackingFacet {
            event,
            properties: properties.map(|props| -> Extractor<'a, Value> {
                Box::new(move |_| props.clone())
            }),
        });
        self
    }
}

fn content(title: &str, message: String) -> NotificationContent {
    NotificationContent {
        title: title.to_string(),
        message,
    }
}

fn recipe_activity(activity_type: ActivityType, recipe: &RecipeRef) -> ActivityFacet<'_> {
    let recipe_id = recipe.recipe_id.into_uuid();
    ActivityFacet {
        activity_type,
        target_type: TargetType::Recipe,
        target_id: Box::new(move |_| recipe_id),
        metadata: Some(Box::new(move |_| json!({ "recipeTitle": recipe.recipe_title }))),
    }
}

fn actor_activity<'a>(activity_type: ActivityType) -> ActivityFacet<'a> {
    ActivityFacet {
        activity_type,
        target_type: TargetType::User,
        target_id: Box::new(|ctx: &NotificationContext<'_>| ctx.actor_id.into_uuid()),
        metadata: None,
    }
}

fn followed_activity<'a>(
    activity_type: ActivityType,
    followed: &'a FollowedUser,
) -> ActivityFacet<'a> {
    let followed_id = followed.followed_user_id.into_uuid();
    ActivityFacet {
        activity_type,
        target_type: TargetType::User,
        target_id: Box::new(move |_| followed_id),
        metadata: followed
            .followed_name
            .as_ref()
            .map(|name| -> Extractor<'a, Value> { Box::new(move |_| json!({ "followedName": name })) }),
    }
}

fn recipe_properties(recipe: &RecipeRef) -> Value {
    json!({
        "recipeId": recipe.recipe_id,
        "recipeTitle": recipe.recipe_title,
    })
}

fn email_domain(email: &str) -> Option<&str> {
    email.rsplit_once('@').map(|(_, domain)| domain)
}

impl AppEvent {
    /// Definition for this event. Exhaustive: every event has an activity facet.
    pub fn definition(&self) -> EventDefinition<'_> {
        use NotificationPreferenceKey as Pref;

        match self {
            AppEvent::RecipeCreated(recipe) => {
                EventDefinition::new(recipe_activity(ActivityType::RecipeCreated, recipe))
                    .track("recipe_created", Some(recipe_properties(recipe)))
            }
            AppEvent::RecipeUpdated(recipe) => {
                EventDefinition::new(recipe_activity(ActivityType::RecipeUpdated, recipe))
            }
            AppEvent::RecipePublished(recipe) => {
                EventDefinition::new(recipe_activity(ActivityType::RecipePublished, recipe))
                    .notify(NotificationType::NewRecipe, Pref::NotifyOnNewRecipe, move |ctx| {
                        content(
                            "Neues Rezept",
                            format!(
                                "{} hat ein neues Rezept veröffentlicht: \"{}\"",
                                ctx.actor_label, recipe.recipe_title
                            ),
                        )
                    })
                    .track("recipe_published", Some(recipe_properties(recipe)))
            }
            AppEvent::RecipeFavorited(recipe) => {
                EventDefinition::new(recipe_activity(ActivityType::RecipeFavorited, recipe))
                    .notify(NotificationType::RecipeLike, Pref::NotifyOnRecipeLike, move |ctx| {
                        content(
                            "Neuer Favorit",
                            format!(
                                "{} hat dein Rezept \"{}\" zu den Favoriten hinzugefügt",
                                ctx.actor_label, recipe.recipe_title
                            ),
                        )
                    })
                    .track("recipe_favorited", Some(recipe_properties(recipe)))
            }
            AppEvent::RecipeUnfavorited(recipe) => {
                EventDefinition::new(recipe_activity(ActivityType::RecipeUnfavorited, recipe))
                    .track("recipe_unfavorited", Some(recipe_properties(recipe)))
            }
            AppEvent::RecipeRated(rating) => rated_definition(rating),
            AppEvent::RecipeCooked(recipe) => {
                EventDefinition::new(recipe_activity(ActivityType::RecipeCooked, recipe))
                    .notify(NotificationType::RecipeCooked, Pref::NotifyOnRecipeCooked, move |ctx| {
                        content(
                            "Rezept nachgekocht",
                            format!(
                                "{} hat dein Rezept \"{}\" nachgekocht",
                                ctx.actor_label, recipe.recipe_title
                            ),
                        )
                    })
                    .track("recipe_cooked", Some(recipe_properties(recipe)))
            }
            AppEvent::RecipeCommented(comment) => commented_definition(comment),
            AppEvent::UserFollowed(followed) => {
                EventDefinition::new(followed_activity(ActivityType::UserFollowed, followed))
                    .notify(NotificationType::NewFollower, Pref::NotifyOnNewFollower, move |ctx| {
                        content("Neuer Follower", format!("{} folgt dir jetzt", ctx.actor_label))
                    })
                    .track(
                        "user_followed",
                        Some(json!({ "followedUserId": followed.followed_user_id })),
                    )
            }
            AppEvent::UserUnfollowed(followed) => {
                EventDefinition::new(followed_activity(ActivityType::UserUnfollowed, followed))
            }
            AppEvent::UserRegistered(registration) => {
                EventDefinition::new(actor_activity(ActivityType::UserRegistered))
                    .notify(
                        NotificationType::System,
                        Pref::NotifyOnSystemMessages,
                        move |ctx| {
                            content(
                                "Willkommen bei Rezeptbuch!",
                                format!(
                                    "Schön, dass du da bist, {}! Entdecke Rezepte und teile deine eigenen.",
                                    ctx.actor_label
                                ),
                            )
                        },
                    )
                    .track(
                        "user_registered",
                        email_domain(&registration.email)
                            .map(|domain| json!({ "emailDomain": domain })),
                    )
            }
            AppEvent::UserActivated(_) => {
                EventDefinition::new(actor_activity(ActivityType::UserActivated))
                    .notify(NotificationType::System, Pref::NotifyOnSystemMessages, |_| {
                        content(
                            "Konto aktiviert",
                            "Dein Konto ist jetzt aktiv. Viel Spaß beim Kochen!".to_string(),
                        )
                    })
                    .track("user_activated", None)
            }
        }
    }
}

fn rated_definition(rating: &RecipeRating) -> EventDefinition<'_> {
    let recipe_id = rating.recipe_id.into_uuid();
    let activity = ActivityFacet {
        activity_type: ActivityType::RecipeRated,
        target_type: TargetType::Recipe,
        target_id: Box::new(move |_| recipe_id),
        metadata: Some(Box::new(move |_| {
            json!({ "recipeTitle": rating.recipe_title, "rating": rating.rating })
        })),
    };

    EventDefinition::new(activity)
        .notify(
            NotificationType::RecipeRating,
            NotificationPreferenceKey::NotifyOnRecipeRating,
            move |ctx| {
                content(
                    "Neue Bewertung",
                    format!(
                        "{} hat dein Rezept \"{}\" mit {} von 5 Sternen bewertet",
                        ctx.actor_label, rating.recipe_title, rating.rating
                    ),
                )
            },
        )
        .track(
            "recipe_rated",
            Some(json!({
                "recipeId": rating.recipe_id,
                "recipeTitle": rating.recipe_title,
                "rating": rating.rating,
            })),
        )
}

fn commented_definition(comment: &RecipeComment) -> EventDefinition<'_> {
    let recipe_id = comment.recipe_id.into_uuid();
    let activity = ActivityFacet {
        activity_type: ActivityType::RecipeCommented,
        target_type: TargetType::Recipe,
        target_id: Box::new(move |_| recipe_id),
        metadata: Some(Box::new(move |_| {
            json!({ "recipeTitle": comment.recipe_title, "commentId": comment.comment_id })
        })),
    };

    EventDefinition::new(activity)
        .notify(
            NotificationType::RecipeComment,
            NotificationPreferenceKey::NotifyOnRecipeComment,
            move |ctx| {
                let message = match comment.excerpt.as_deref().map(str::trim) {
                    Some(excerpt) if !excerpt.is_empty() => format!(
                        "{} hat dein Rezept \"{}\" kommentiert: \"{}\"",
                        ctx.actor_label, comment.recipe_title, excerpt
                    ),
                    _ => format!(
                        "{} hat dein Rezept \"{}\" kommentiert",
                        ctx.actor_label, comment.recipe_title
                    ),
                };
                content("Neuer Kommentar", message)
            },
        )
        .with_payload(move |ctx| {
            json!({
                "actorId": ctx.actor_id,
                "recipeId": comment.recipe_id,
                "commentId": comment.comment_id,
            })
        })
        .track(
            "recipe_commented",
            Some(json!({ "recipeId": comment.recipe_id, "commentId": comment.comment_id })),
        )
}

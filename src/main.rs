//! LANGPAIR - Telegram translation panel

mod app;
mod config;
mod consts;
mod network;
mod overlay;
mod panel;
mod translate;
mod utils;
mod view;

use crate::app::Screens;
use crate::config::Config;
use crate::network::{Translate, TranslateEngine};
use crate::translate::TranslationRequest;
use crate::utils::is_command;
use crate::view::{Action, View};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};
use teloxide::utils::command::BotCommands;
use teloxide::{ApiError, RequestError};

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
enum Command {
    #[command(description = "Show the start screen")]
    Start,
    #[command(description = "Show help message")]
    Help,
    #[command(description = "Open the translator")]
    Translate,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let engine = match TranslateEngine::new(config.api_url.clone()) {
        Ok(e) => e,
        Err(e) => {
            log::error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("LANGPAIR online, endpoint {}", config.api_url);

    let bot = Bot::new(config.bot_token);
    let screens = Screens::new();

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .branch(dptree::entry().filter_command::<Command>().endpoint(handle_command))
                .branch(dptree::endpoint(handle_text)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![screens, engine])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    screens: Arc<Screens>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;

    let view = match cmd {
        Command::Help => {
            bot.send_message(chat_id, Command::descriptions().to_string()).await?;
            return Ok(());
        }
        Command::Start => screens.with_chat(chat_id, |c| {
            c.unmount();
            c.view()
        }),
        Command::Translate => screens.with_chat(chat_id, |c| {
            c.handle(Action::Open);
            c.view()
        }),
    };

    show_at_bottom(&bot, chat_id, &screens, &view).await
}

async fn handle_text(
    bot: Bot,
    msg: Message,
    screens: Arc<Screens>,
    engine: Arc<TranslateEngine>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else { return Ok(()) };
    let chat_id = msg.chat.id;

    if is_command(text) {
        log::debug!("Ignoring unknown command {:?} in {:?}", text, chat_id);
        return Ok(());
    }

    let (request, view) = screens.with_chat(chat_id, |c| (c.handle_text(text), c.view()));
    show_at_bottom(&bot, chat_id, &screens, &view).await?;

    if let Some(req) = request {
        spawn_translation(bot, chat_id, req, screens, engine);
    }
    Ok(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    screens: Arc<Screens>,
    engine: Arc<TranslateEngine>,
) -> ResponseResult<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let (Some(data), Some(msg)) = (q.data.as_deref(), q.message.as_ref()) else {
        return Ok(());
    };
    let Some(action) = Action::parse(data) else {
        log::warn!("Unknown callback data {:?}", data);
        return Ok(());
    };
    let chat_id = msg.chat.id;

    let (request, view) = screens.with_chat(chat_id, |c| {
        c.message = Some(msg.id);
        (c.handle(action), c.view())
    });
    edit_view(&bot, chat_id, msg.id, &view).await?;

    if let Some(req) = request {
        spawn_translation(bot, chat_id, req, screens, engine);
    }
    Ok(())
}

/// Runs the request off the handler so the chat stays interactive
fn spawn_translation<T: Translate + 'static>(
    bot: Bot,
    chat_id: ChatId,
    req: TranslationRequest,
    screens: Arc<Screens>,
    engine: Arc<T>,
) {
    tokio::spawn(async move {
        let result = engine.translate(&req).await;

        let refreshed = screens.with_chat(chat_id, |c| {
            c.complete(req.ticket, result).then(|| (c.view(), c.message))
        });

        if let Some((view, Some(message))) = refreshed {
            if let Err(e) = edit_view(&bot, chat_id, message, &view).await {
                log::error!("Failed to refresh panel in {:?}: {}", chat_id, e);
            }
        }
    });
}

fn keyboard(view: &View) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(view.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.action.data()))
            .collect::<Vec<_>>()
    }))
}

/// Re-sends the screen below the latest message and drops the old copy
async fn show_at_bottom(
    bot: &Bot,
    chat_id: ChatId,
    screens: &Screens,
    view: &View,
) -> ResponseResult<()> {
    let sent = bot
        .send_message(chat_id, view.text.clone())
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard(view))
        .await?;

    let previous = screens.with_chat(chat_id, |c| c.message.replace(sent.id));
    if let Some(old) = previous {
        let _ = bot.delete_message(chat_id, old).await;
    }
    Ok(())
}

async fn edit_view(bot: &Bot, chat_id: ChatId, message: MessageId, view: &View) -> ResponseResult<()> {
    let edited = bot
        .edit_message_text(chat_id, message, view.text.clone())
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard(view))
        .await;

    match edited {
        Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(e) => Err(e),
    }
}

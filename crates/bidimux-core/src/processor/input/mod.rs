//! input.* commands: trusted input dispatch.

mod keys;

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{Value, json};

use bidimux_cdp::protocol::dom::SetFileInputFilesParams;
use bidimux_cdp::protocol::input::{
    DispatchKeyEventParams, DispatchMouseEventParams, MouseButton,
};
use bidimux_cdp::CdpSession;

use crate::error::{Error, ErrorCode, Result};
use crate::protocol::browsing_context::SharedReference;
use crate::protocol::input::{
    KeyAction, Origin, PerformActionsParams, PointerAction, ReleaseActionsParams, SetFilesParams,
    SourceActions, WheelAction,
};
use crate::realm::shared_id::SharedId;
use crate::session::BidiSession;

use keys::{KeyData, resolve};

/// Persistent input state of one browsing context.
#[derive(Debug, Default, Clone)]
pub(crate) struct InputState {
    /// Keys currently held down, in press order.
    pressed_keys: Vec<String>,
    /// Active modifier bits.
    modifiers: u32,
    /// Current pointer position.
    pointer_x: f64,
    pointer_y: f64,
    /// Buttons currently held down, in press order.
    pressed_buttons: Vec<u32>,
}

impl InputState {
    fn buttons_mask(&self) -> u32 {
        self.pressed_buttons
            .iter()
            .map(|b| match b {
                0 => 1,
                1 => 4,
                2 => 2,
                3 => 8,
                4 => 16,
                _ => 0,
            })
            .sum()
    }
}

fn cdp_button(button: u32) -> MouseButton {
    match button {
        0 => MouseButton::Left,
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        3 => MouseButton::Back,
        4 => MouseButton::Forward,
        _ => MouseButton::None,
    }
}

/// One action at one tick position, flattened from the per-source lists.
enum TickAction<'a> {
    Key(&'a KeyAction),
    Pointer(&'a PointerAction),
    Wheel(&'a WheelAction),
}

/// input.performActions
pub async fn perform_actions(session: &BidiSession, params: PerformActionsParams) -> Result<Value> {
    let context = session.contexts().get(&params.context).await?;
    let target = context.target().await;
    target.wait_unblocked().await?;
    let client = target.session().clone();

    let mut state = {
        let states = session.inner().input_states.lock().await;
        states.get(&params.context).cloned().unwrap_or_default()
    };

    // Sources advance tick by tick; every source contributes at most one
    // action per tick, and a tick lasts as long as its longest duration.
    let tick_count = params
        .actions
        .iter()
        .map(|source| match source {
            SourceActions::None { actions, .. } => actions.len(),
            SourceActions::Key { actions, .. } => actions.len(),
            SourceActions::Pointer { actions, .. } => actions.len(),
            SourceActions::Wheel { actions, .. } => actions.len(),
        })
        .max()
        .unwrap_or(0);

    for tick in 0..tick_count {
        let mut tick_pause = 0u64;
        for source in &params.actions {
            let action = match source {
                SourceActions::None { actions, .. } => {
                    if let Some(crate::protocol::input::PauseAction::Pause { duration }) =
                        actions.get(tick)
                    {
                        tick_pause = tick_pause.max(duration.unwrap_or(0));
                    }
                    continue;
                }
                SourceActions::Key { actions, .. } => actions.get(tick).map(TickAction::Key),
                SourceActions::Pointer { actions, .. } => {
                    actions.get(tick).map(TickAction::Pointer)
                }
                SourceActions::Wheel { actions, .. } => actions.get(tick).map(TickAction::Wheel),
            };
            let Some(action) = action else { continue };

            match action {
                TickAction::Key(KeyAction::Pause { duration })
                | TickAction::Pointer(PointerAction::Pause { duration })
                | TickAction::Wheel(WheelAction::Pause { duration }) => {
                    tick_pause = tick_pause.max(duration.unwrap_or(0));
                }
                TickAction::Key(KeyAction::KeyDown { value }) => {
                    dispatch_key(&client, &mut state, value, true).await?;
                }
                TickAction::Key(KeyAction::KeyUp { value }) => {
                    dispatch_key(&client, &mut state, value, false).await?;
                }
                TickAction::Pointer(PointerAction::PointerDown { button }) => {
                    dispatch_pointer_button(&client, &mut state, *button, true).await?;
                }
                TickAction::Pointer(PointerAction::PointerUp { button }) => {
                    dispatch_pointer_button(&client, &mut state, *button, false).await?;
                }
                TickAction::Pointer(PointerAction::PointerMove {
                    x,
                    y,
                    duration,
                    origin,
                }) => {
                    let (x, y) =
                        resolve_coordinates(session, &state, &params.context, *x, *y, origin)
                            .await?;
                    tick_pause = tick_pause.max(duration.unwrap_or(0));
                    state.pointer_x = x;
                    state.pointer_y = y;
                    client
                        .send_unit(
                            "Input.dispatchMouseEvent",
                            Some(DispatchMouseEventParams {
                                event_type: "mouseMoved".to_string(),
                                x,
                                y,
                                modifiers: Some(state.modifiers),
                                buttons: Some(state.buttons_mask()),
                                ..Default::default()
                            }),
                        )
                        .await
                        .map_err(Error::from)?;
                }
                TickAction::Wheel(WheelAction::Scroll {
                    x,
                    y,
                    delta_x,
                    delta_y,
                    duration,
                    origin,
                }) => {
                    let (x, y) =
                        resolve_coordinates(session, &state, &params.context, *x, *y, origin)
                            .await?;
                    tick_pause = tick_pause.max(duration.unwrap_or(0));
                    client
                        .send_unit(
                            "Input.dispatchMouseEvent",
                            Some(DispatchMouseEventParams {
                                event_type: "mouseWheel".to_string(),
                                x,
                                y,
                                modifiers: Some(state.modifiers),
                                delta_x: Some(*delta_x),
                                delta_y: Some(*delta_y),
                                ..Default::default()
                            }),
                        )
                        .await
                        .map_err(Error::from)?;
                }
            }
        }

        if tick_pause > 0 {
            tokio::time::sleep(Duration::from_millis(tick_pause)).await;
        }
    }

    session
        .inner()
        .input_states
        .lock()
        .await
        .insert(params.context.clone(), state);
    Ok(json!({}))
}

/// input.releaseActions
pub async fn release_actions(session: &BidiSession, params: ReleaseActionsParams) -> Result<Value> {
    let context = session.contexts().get(&params.context).await?;
    let target = context.target().await;
    let client = target.session().clone();

    let mut state = {
        let mut states = session.inner().input_states.lock().await;
        states.remove(&params.context).unwrap_or_default()
    };

    // Undo in reverse press order.
    for button in state.pressed_buttons.clone().into_iter().rev() {
        dispatch_pointer_button(&client, &mut state, button, false).await?;
    }
    for key in state.pressed_keys.clone().into_iter().rev() {
        dispatch_key(&client, &mut state, &key, false).await?;
    }
    Ok(json!({}))
}

/// input.setFiles
pub async fn set_files(session: &BidiSession, params: SetFilesParams) -> Result<Value> {
    let context = session.contexts().get(&params.context).await?;
    let target = context.target().await;

    let shared = SharedId::parse(&params.element.shared_id)?;
    if shared.navigable_id != params.context {
        return Err(Error::new(
            ErrorCode::NoSuchElement,
            "The element belongs to a different document",
        ));
    }

    target
        .session()
        .send_unit(
            "DOM.setFileInputFiles",
            Some(SetFileInputFilesParams {
                files: params.files,
                object_id: None,
                backend_node_id: Some(shared.backend_node_id),
            }),
        )
        .await
        .map_err(|err| {
            if err.protocol_message_contains("Node is not") {
                Error::invalid_argument(err.to_string())
            } else {
                Error::from(err)
            }
        })?;
    Ok(json!({}))
}

async fn dispatch_key(
    client: &CdpSession,
    state: &mut InputState,
    value: &str,
    down: bool,
) -> Result<()> {
    let KeyData {
        key,
        code,
        windows_virtual_key_code,
        text,
        modifier_bit,
    } = resolve(value);

    if down {
        if let Some(bit) = modifier_bit {
            state.modifiers |= bit;
        }
        if !state.pressed_keys.iter().any(|k| k == value) {
            state.pressed_keys.push(value.to_string());
        }
    } else {
        if let Some(bit) = modifier_bit {
            state.modifiers &= !bit;
        }
        state.pressed_keys.retain(|k| k != value);
    }

    let event_type = match (down, &text) {
        (true, Some(_)) => "keyDown",
        (true, None) => "rawKeyDown",
        (false, _) => "keyUp",
    };

    client
        .send_unit(
            "Input.dispatchKeyEvent",
            Some(DispatchKeyEventParams {
                event_type: event_type.to_string(),
                modifiers: Some(state.modifiers),
                text: down.then(|| text.clone()).flatten(),
                unmodified_text: down.then(|| text).flatten(),
                key: Some(key),
                code,
                windows_virtual_key_code: Some(windows_virtual_key_code),
                native_virtual_key_code: Some(windows_virtual_key_code),
                ..Default::default()
            }),
        )
        .await
        .map_err(Error::from)
}

async fn dispatch_pointer_button(
    client: &CdpSession,
    state: &mut InputState,
    button: u32,
    down: bool,
) -> Result<()> {
    if down {
        if !state.pressed_buttons.contains(&button) {
            state.pressed_buttons.push(button);
        }
    } else {
        state.pressed_buttons.retain(|b| *b != button);
    }

    client
        .send_unit(
            "Input.dispatchMouseEvent",
            Some(DispatchMouseEventParams {
                event_type: if down { "mousePressed" } else { "mouseReleased" }.to_string(),
                x: state.pointer_x,
                y: state.pointer_y,
                modifiers: Some(state.modifiers),
                button: Some(cdp_button(button)),
                buttons: Some(state.buttons_mask()),
                click_count: Some(1),
                ..Default::default()
            }),
        )
        .await
        .map_err(Error::from)
}

/// Resolve action coordinates against their origin.
async fn resolve_coordinates(
    session: &BidiSession,
    state: &InputState,
    context_id: &str,
    x: f64,
    y: f64,
    origin: &Option<Origin>,
) -> Result<(f64, f64)> {
    let (x, y) = match origin.as_ref().unwrap_or(&Origin::Unspecified) {
        Origin::Unspecified => (x, y),
        Origin::Keyword(keyword) if keyword == "viewport" => (x, y),
        Origin::Keyword(keyword) if keyword == "pointer" => {
            (state.pointer_x + x, state.pointer_y + y)
        }
        Origin::Keyword(keyword) => {
            return Err(Error::invalid_argument(format!(
                "Unknown origin '{keyword}'"
            )));
        }
        Origin::Element { element, .. } => {
            let (cx, cy) = element_center(session, context_id, element).await?;
            (cx + x, cy + y)
        }
    };

    if x < 0.0 || y < 0.0 {
        return Err(Error::new(
            ErrorCode::MoveTargetOutOfBounds,
            format!("Coordinates ({x}, {y}) are outside the viewport"),
        ));
    }
    Ok((x, y))
}

/// The viewport-relative center of an element.
async fn element_center(
    session: &BidiSession,
    context_id: &str,
    element: &SharedReference,
) -> Result<(f64, f64)> {
    use crate::protocol::value::{ArgumentValue, RemoteReference};
    use crate::realm::deserializer::{DeserializationContext, deserialize_argument};

    let realm = super::script::resolve_realm(
        session,
        &crate::protocol::value::Target::Context {
            context: context_id.to_string(),
            sandbox: None,
        },
    )
    .await?;

    let ctx = DeserializationContext {
        realm: &realm,
        event_manager: session.event_manager(),
        event_scope: session.scope_for_context(context_id).await,
    };
    let reference = ArgumentValue::Reference(RemoteReference::Shared {
        shared_id: element.shared_id.clone(),
        handle: element.handle.clone(),
    });
    let argument = deserialize_argument(&ctx, &reference).await?;

    let result: bidimux_cdp::protocol::runtime::CallFunctionOnResult = realm
        .session()
        .send(
            "Runtime.callFunctionOn",
            Some(bidimux_cdp::protocol::runtime::CallFunctionOnParams {
                function_declaration: "function(element) {\
 const rect = element.getBoundingClientRect();\
 return {x: rect.x + rect.width / 2, y: rect.y + rect.height / 2};\
}"
                .to_string(),
                arguments: Some(vec![argument]),
                return_by_value: Some(true),
                execution_context_id: Some(realm.execution_context_id()),
                ..Default::default()
            }),
        )
        .await
        .map_err(Error::from)?;

    if let Some(details) = result.exception_details {
        return Err(Error::new(ErrorCode::NoSuchElement, details.text));
    }
    let value = result.result.value.unwrap_or(Value::Null);
    let x = value.get("x").and_then(Value::as_f64).unwrap_or(0.0);
    let y = value.get("y").and_then(Value::as_f64).unwrap_or(0.0);
    Ok((x, y))
}

/// Session-level map of per-context input state.
pub(crate) type InputStates = HashMap<String, InputState>;

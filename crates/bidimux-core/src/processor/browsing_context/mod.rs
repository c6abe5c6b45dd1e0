//! browsingContext.* commands.

mod locate;
mod print;
mod screenshot;

use std::time::Duration;

use serde_json::{Value, json};

use bidimux_cdp::protocol::accessibility::{EnableParams as AxEnableParams, GetRootAxNodeParams};
use bidimux_cdp::protocol::emulation::{
    ClearDeviceMetricsOverrideParams, SetDeviceMetricsOverrideParams,
};
use bidimux_cdp::protocol::page::{
    BringToFrontParams, CaptureScreenshotParams as CdpCaptureScreenshotParams,
    CaptureScreenshotResult, GetNavigationHistoryParams, GetNavigationHistoryResult,
    HandleJavaScriptDialogParams, NavigateToHistoryEntryParams, PrintToPdfParams,
    PrintToPdfResult, ScreenshotFormat, Viewport as CdpViewport,
};
use bidimux_cdp::protocol::runtime::{CallArgument, EvaluateParams as CdpEvaluateParams};
use bidimux_cdp::protocol::target_domain::{
    ActivateTargetParams, CloseTargetParams, CreateTargetParams, CreateTargetResult,
};

use crate::error::{Error, ErrorCode, Result};
use crate::protocol::browsing_context::{
    ActivateParams, CaptureScreenshotParams, ClipRectangle, CloseParams, CreateParams, CreateType,
    GetTreeParams, HandleUserPromptParams, LocateNodesParams, LocateNodesResult, Locator,
    NavigateParams, PrintParams, ReloadParams, ScreenshotOrigin, SetViewportParams,
    TraverseHistoryParams,
};
use crate::protocol::value::Target as ScriptTarget;
use crate::realm::deserializer::{DeserializationContext, deserialize_argument};
use crate::session::BidiSession;
use crate::session::user_contexts::UserContextStorage;

use screenshot::Rect;

/// Sandbox used for mediator-internal script evaluation.
const INTERNAL_SANDBOX: &str = "__bidimux_internal__";

/// browsingContext.getTree
pub async fn get_tree(session: &BidiSession, params: GetTreeParams) -> Result<Value> {
    let contexts = session
        .contexts()
        .get_tree(params.max_depth, params.root.as_deref())
        .await?;
    Ok(json!({ "contexts": contexts }))
}

/// browsingContext.create
pub async fn create(session: &BidiSession, params: CreateParams) -> Result<Value> {
    let user_context = params
        .user_context
        .unwrap_or_else(|| crate::session::DEFAULT_USER_CONTEXT.to_string());
    session
        .inner()
        .user_contexts
        .lock()
        .await
        .verify(&user_context)?;
    if let Some(reference) = &params.reference_context {
        session.contexts().get_top_level(reference).await?;
    }

    let result: CreateTargetResult = session
        .browser()
        .send(
            "Target.createTarget",
            Some(CreateTargetParams {
                url: "about:blank".to_string(),
                browser_context_id: UserContextStorage::browser_context_id(&user_context)
                    .map(str::to_string),
                new_window: Some(params.create_type == CreateType::Window),
                background: params.background,
            }),
        )
        .await
        .map_err(Error::from)?;

    // The context materialises through the auto-attach flow; wait for it
    // to land in the storage.
    for _ in 0..2000 {
        if let Some(context) = session.contexts().find_by_target(&result.target_id).await {
            return Ok(json!({ "context": context.id() }));
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    Err(Error::unknown("Created target never attached"))
}

/// browsingContext.close
pub async fn close(session: &BidiSession, params: CloseParams) -> Result<Value> {
    let context = session.contexts().get_top_level(&params.context).await?;
    let target = context.target().await;
    session
        .browser()
        .send_unit(
            "Target.closeTarget",
            Some(CloseTargetParams {
                target_id: target.target_id().to_string(),
            }),
        )
        .await
        .map_err(Error::from)?;
    Ok(json!({}))
}

/// browsingContext.navigate
pub async fn navigate(session: &BidiSession, params: NavigateParams) -> Result<Value> {
    let context = session.contexts().get(&params.context).await?;
    let result = context
        .navigate(&params.url, params.wait.unwrap_or_default())
        .await?;
    Ok(json!(result))
}

/// browsingContext.reload
pub async fn reload(session: &BidiSession, params: ReloadParams) -> Result<Value> {
    let context = session.contexts().get(&params.context).await?;
    let result = context
        .reload(
            params.ignore_cache.unwrap_or(false),
            params.wait.unwrap_or_default(),
        )
        .await?;
    Ok(json!(result))
}

/// browsingContext.activate
pub async fn activate(session: &BidiSession, params: ActivateParams) -> Result<Value> {
    let context = session.contexts().get_top_level(&params.context).await?;
    let target = context.target().await;
    session
        .browser()
        .send_unit(
            "Target.activateTarget",
            Some(ActivateTargetParams {
                target_id: target.target_id().to_string(),
            }),
        )
        .await
        .map_err(Error::from)?;
    target
        .session()
        .send_unit("Page.bringToFront", Some(BringToFrontParams::default()))
        .await
        .map_err(Error::from)?;
    Ok(json!({}))
}

/// browsingContext.handleUserPrompt
pub async fn handle_user_prompt(
    session: &BidiSession,
    params: HandleUserPromptParams,
) -> Result<Value> {
    let context = session.contexts().get(&params.context).await?;
    if context.last_prompt().await.is_none() {
        return Err(Error::new(ErrorCode::NoSuchAlert, "No prompt is open"));
    }

    let target = context.target().await;
    target
        .session()
        .send_unit(
            "Page.handleJavaScriptDialog",
            Some(HandleJavaScriptDialogParams {
                accept: params.accept.unwrap_or(true),
                prompt_text: params.user_text,
            }),
        )
        .await
        .map_err(|err| {
            if err.protocol_message_contains("No dialog is showing") {
                Error::new(ErrorCode::NoSuchAlert, "No prompt is open")
            } else {
                Error::from(err)
            }
        })?;
    Ok(json!({}))
}

/// The origin rectangle and scroll offsets, measured in a sandboxed
/// evaluation inside the page.
async fn measure_origin(
    session: &BidiSession,
    context_id: &str,
    origin: ScreenshotOrigin,
) -> Result<(Rect, f64, f64)> {
    let realm = super::script::resolve_realm(
        session,
        &ScriptTarget::Context {
            context: context_id.to_string(),
            sandbox: Some(INTERNAL_SANDBOX.to_string()),
        },
    )
    .await?;

    let expression = match origin {
        ScreenshotOrigin::Viewport => {
            "({x: window.pageXOffset, y: window.pageYOffset, \
              width: window.innerWidth, height: window.innerHeight, \
              scrollX: window.pageXOffset, scrollY: window.pageYOffset})"
        }
        ScreenshotOrigin::Document => {
            "({x: 0, y: 0, \
              width: document.documentElement.scrollWidth, \
              height: document.documentElement.scrollHeight, \
              scrollX: window.pageXOffset, scrollY: window.pageYOffset})"
        }
    };

    let result: bidimux_cdp::protocol::runtime::EvaluateResult = realm
        .session()
        .send(
            "Runtime.evaluate",
            Some(CdpEvaluateParams {
                expression: expression.to_string(),
                context_id: Some(realm.execution_context_id()),
                return_by_value: Some(true),
                ..Default::default()
            }),
        )
        .await
        .map_err(Error::from)?;
    if let Some(details) = result.exception_details {
        return Err(Error::new(ErrorCode::UnableToCaptureScreen, details.text));
    }

    let value = result.result.value.unwrap_or(Value::Null);
    let number = |key: &str| value.get(key).and_then(Value::as_f64).unwrap_or(0.0);
    Ok((
        Rect {
            x: number("x"),
            y: number("y"),
            width: number("width"),
            height: number("height"),
        },
        number("scrollX"),
        number("scrollY"),
    ))
}

/// The document-coordinate rectangle of a clip element.
async fn measure_element(
    session: &BidiSession,
    context_id: &str,
    element: &crate::protocol::browsing_context::SharedReference,
    scroll_x: f64,
    scroll_y: f64,
) -> Result<Rect> {
    let realm = super::script::resolve_realm(
        session,
        &ScriptTarget::Context {
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
    let reference = crate::protocol::value::ArgumentValue::Reference(
        crate::protocol::value::RemoteReference::Shared {
            shared_id: element.shared_id.clone(),
            handle: element.handle.clone(),
        },
    );
    let argument = deserialize_argument(&ctx, &reference).await?;

    let result: bidimux_cdp::protocol::runtime::CallFunctionOnResult = realm
        .session()
        .send(
            "Runtime.callFunctionOn",
            Some(bidimux_cdp::protocol::runtime::CallFunctionOnParams {
                function_declaration: "function(element) {\
 const rect = element.getBoundingClientRect();\
 return {x: rect.x, y: rect.y, width: rect.width, height: rect.height};\
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
    let number = |key: &str| value.get(key).and_then(Value::as_f64).unwrap_or(0.0);
    // Bounding rects are viewport-relative; shift into document space.
    Ok(Rect {
        x: number("x") + scroll_x,
        y: number("y") + scroll_y,
        width: number("width"),
        height: number("height"),
    })
}

/// browsingContext.captureScreenshot
pub async fn capture_screenshot(
    session: &BidiSession,
    params: CaptureScreenshotParams,
) -> Result<Value> {
    let context = session.contexts().get(&params.context).await?;
    let target = context.target().await;
    target.wait_unblocked().await?;

    let origin = params.origin.unwrap_or_default();
    let (origin_rect, scroll_x, scroll_y) =
        measure_origin(session, context.id(), origin).await?;

    let clip_rect = match &params.clip {
        None => origin_rect,
        Some(ClipRectangle::Box {
            x,
            y,
            width,
            height,
        }) => Rect {
            x: origin_rect.x + x,
            y: origin_rect.y + y,
            width: *width,
            height: *height,
        }
        .normalised(),
        Some(ClipRectangle::Element { element }) => {
            measure_element(session, context.id(), element, scroll_x, scroll_y).await?
        }
    };

    let capture = origin_rect.intersection(clip_rect);
    if capture.is_empty() {
        return Err(Error::new(
            ErrorCode::UnableToCaptureScreen,
            "The capture area is empty",
        ));
    }

    let (format, quality) = match &params.format {
        None => (ScreenshotFormat::Png, None),
        Some(format) => match format.image_type.as_str() {
            "image/png" => (ScreenshotFormat::Png, None),
            "image/jpeg" => (
                ScreenshotFormat::Jpeg,
                format.quality.map(|q| (q * 100.0).clamp(0.0, 100.0) as u32),
            ),
            "image/webp" => (
                ScreenshotFormat::Webp,
                format.quality.map(|q| (q * 100.0).clamp(0.0, 100.0) as u32),
            ),
            other => {
                return Err(Error::invalid_argument(format!(
                    "Unsupported image format '{other}'"
                )));
            }
        },
    };

    let result: CaptureScreenshotResult = target
        .session()
        .send(
            "Page.captureScreenshot",
            Some(CdpCaptureScreenshotParams {
                format: Some(format),
                quality,
                clip: Some(CdpViewport {
                    x: capture.x,
                    y: capture.y,
                    width: capture.width,
                    height: capture.height,
                    scale: 1.0,
                }),
                capture_beyond_viewport: Some(true),
                optimize_for_speed: None,
            }),
        )
        .await
        .map_err(|err| Error::new(ErrorCode::UnableToCaptureScreen, err.to_string()))?;

    Ok(json!({ "data": result.data }))
}

/// browsingContext.print
pub async fn print(session: &BidiSession, params: PrintParams) -> Result<Value> {
    let context = session.contexts().get_top_level(&params.context).await?;
    let target = context.target().await;
    target.wait_unblocked().await?;

    if let Some(scale) = params.scale {
        if !(0.1..=2.0).contains(&scale) {
            return Err(Error::invalid_argument(
                "Print scale must be between 0.1 and 2",
            ));
        }
    }

    let page_ranges = params
        .page_ranges
        .as_deref()
        .map(print::format_page_ranges)
        .transpose()?
        .filter(|ranges| !ranges.is_empty());

    let margin = params.margin.unwrap_or_default();
    let page = params.page.unwrap_or_default();
    let cdp_params = PrintToPdfParams {
        landscape: Some(
            params.orientation.unwrap_or_default()
                == crate::protocol::browsing_context::PrintOrientation::Landscape,
        ),
        display_header_footer: Some(false),
        print_background: params.background,
        scale: params.scale,
        paper_width: page.width.map(print::cm_to_inches),
        paper_height: page.height.map(print::cm_to_inches),
        margin_top: margin.top.map(print::cm_to_inches),
        margin_bottom: margin.bottom.map(print::cm_to_inches),
        margin_left: margin.left.map(print::cm_to_inches),
        margin_right: margin.right.map(print::cm_to_inches),
        page_ranges,
        prefer_css_page_size: params.shrink_to_fit.map(|shrink| !shrink),
    };

    let result: PrintToPdfResult = target
        .session()
        .send("Page.printToPDF", Some(cdp_params))
        .await
        .map_err(|err| {
            if err.protocol_message_contains("invalid print parameters: content area is empty") {
                Error::new(ErrorCode::UnsupportedOperation, err.to_string())
            } else {
                Error::from(err)
            }
        })?;

    Ok(json!({ "data": result.data }))
}

/// browsingContext.setViewport
pub async fn set_viewport(session: &BidiSession, params: SetViewportParams) -> Result<Value> {
    let context = session.contexts().get_top_level(&params.context).await?;
    let target = context.target().await;
    target.wait_unblocked().await?;

    let (previous_viewport, previous_ratio) = context.viewport_overrides().await;
    let viewport = match params.viewport {
        None => previous_viewport,
        Some(None) => None,
        Some(Some(viewport)) => Some((viewport.width, viewport.height)),
    };
    let device_pixel_ratio = match params.device_pixel_ratio {
        None => previous_ratio,
        Some(None) => None,
        Some(Some(ratio)) => {
            if ratio <= 0.0 {
                return Err(Error::invalid_argument(
                    "devicePixelRatio must be positive",
                ));
            }
            Some(ratio)
        }
    };

    if viewport.is_none() && device_pixel_ratio.is_none() {
        target
            .session()
            .send_unit(
                "Emulation.clearDeviceMetricsOverride",
                Some(ClearDeviceMetricsOverrideParams::default()),
            )
            .await
            .map_err(Error::from)?;
    } else {
        let (width, height) = viewport.unwrap_or((0, 0));
        target
            .session()
            .send_unit(
                "Emulation.setDeviceMetricsOverride",
                Some(SetDeviceMetricsOverrideParams {
                    width: width as i64,
                    height: height as i64,
                    device_scale_factor: device_pixel_ratio.unwrap_or(0.0),
                    mobile: false,
                    screen_orientation: None,
                }),
            )
            .await
            .map_err(|err| {
                if err.protocol_message_contains("Width and height values must be positive") {
                    Error::new(
                        ErrorCode::UnsupportedOperation,
                        "Viewport dimensions are out of range",
                    )
                } else {
                    Error::from(err)
                }
            })?;
    }

    context
        .set_viewport_overrides(viewport, device_pixel_ratio)
        .await;
    Ok(json!({}))
}

/// browsingContext.traverseHistory
pub async fn traverse_history(
    session: &BidiSession,
    params: TraverseHistoryParams,
) -> Result<Value> {
    let context = session.contexts().get_top_level(&params.context).await?;
    let target = context.target().await;

    if params.delta == 0 {
        return Ok(json!({}));
    }

    let history: GetNavigationHistoryResult = target
        .session()
        .send(
            "Page.getNavigationHistory",
            Some(GetNavigationHistoryParams::default()),
        )
        .await
        .map_err(Error::from)?;

    let index = history.current_index + params.delta;
    let entry = usize::try_from(index)
        .ok()
        .and_then(|index| history.entries.get(index))
        .ok_or_else(|| {
            Error::new(
                ErrorCode::NoSuchHistoryEntry,
                format!("No history entry at delta {}", params.delta),
            )
        })?;

    target
        .session()
        .send_unit(
            "Page.navigateToHistoryEntry",
            Some(NavigateToHistoryEntryParams { entry_id: entry.id }),
        )
        .await
        .map_err(Error::from)?;
    Ok(json!({}))
}

/// browsingContext.locateNodes
pub async fn locate_nodes(session: &BidiSession, params: LocateNodesParams) -> Result<Value> {
    let context = session.contexts().get(&params.context).await?;
    let target = context.target().await;
    target.wait_unblocked().await?;

    // The max count rides along as the second argument of every locator.
    let max_count = params
        .max_node_count
        .map_or(Value::Null, |count| json!(count));

    let (declaration, mut arguments) = match &params.locator {
        Locator::Css { value } => (
            locate::CSS_LOCATOR,
            vec![
                CallArgument::from_value(json!(value)),
                CallArgument::from_value(max_count),
            ],
        ),
        Locator::Xpath { value } => (
            locate::XPATH_LOCATOR,
            vec![
                CallArgument::from_value(json!(value)),
                CallArgument::from_value(max_count),
            ],
        ),
        Locator::InnerText {
            value,
            ignore_case,
            match_type,
            max_depth,
        } => {
            if value.is_empty() {
                return Err(Error::new(
                    ErrorCode::InvalidSelector,
                    "innerText locator cannot be empty",
                ));
            }
            (
                locate::INNER_TEXT_LOCATOR,
                vec![
                    CallArgument::from_value(json!(value)),
                    CallArgument::from_value(max_count),
                    CallArgument::from_value(json!(
                        match_type.as_deref().unwrap_or("full") == "full"
                    )),
                    CallArgument::from_value(json!(ignore_case.unwrap_or(false))),
                    CallArgument::from_value(
                        max_depth.map_or(Value::Null, |depth| json!(depth)),
                    ),
                ],
            )
        }
        Locator::Accessibility { value } => {
            // Materialising the AX tree keeps role/name computation warm
            // for the in-page matcher.
            target
                .session()
                .send_unit("Accessibility.enable", Some(AxEnableParams::default()))
                .await
                .map_err(Error::from)?;
            let _: Value = target
                .session()
                .send(
                    "Accessibility.getRootAXNode",
                    Some(GetRootAxNodeParams::default()),
                )
                .await
                .unwrap_or(Value::Null);
            (
                locate::ACCESSIBILITY_LOCATOR,
                vec![
                    CallArgument::from_value(json!({
                        "role": value.role,
                        "name": value.name,
                    })),
                    CallArgument::from_value(max_count),
                ],
            )
        }
    };

    let realm = super::script::resolve_realm(
        session,
        &ScriptTarget::Context {
            context: params.context.clone(),
            sandbox: None,
        },
    )
    .await?;

    // Start nodes resolve in the same realm the locator runs in.
    let ctx = DeserializationContext {
        realm: &realm,
        event_manager: session.event_manager(),
        event_scope: session.scope_for_context(&params.context).await,
    };
    for start_node in params.start_nodes.as_deref().unwrap_or_default() {
        let reference = crate::protocol::value::ArgumentValue::Reference(
            crate::protocol::value::RemoteReference::Shared {
                shared_id: start_node.shared_id.clone(),
                handle: start_node.handle.clone(),
            },
        );
        arguments.push(deserialize_argument(&ctx, &reference).await?);
    }

    let result = realm
        .call_function(
            declaration,
            None,
            arguments,
            false,
            crate::protocol::value::ResultOwnership::None,
            &params.serialization_options.unwrap_or_default(),
            false,
        )
        .await?;

    match result {
        crate::protocol::script::EvaluateResult::Success { result, .. } => {
            let nodes = result
                .get("value")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            Ok(json!(LocateNodesResult { nodes }))
        }
        crate::protocol::script::EvaluateResult::Exception {
            exception_details, ..
        } => {
            let text = exception_details
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or("locator failed");
            match params.locator {
                Locator::Accessibility { .. } => Err(Error::unknown(text)),
                _ => Err(Error::new(ErrorCode::InvalidSelector, text)),
            }
        }
    }
}

//! Conversion of legacy stops-based functions into expressions.
//!
//! The result is always `["coalesce", converted, default]`, ready for
//! [`parse_expression`](crate::parse_expression).

use crate::error::ConvertError;
use crate::property_spec::{PropertySpec, StopFunction};
use crate::types::Type;
use crate::value::number_to_json;
use serde_json::{json, Value};

const NO_DEFAULT: &str = "No default property value available.";

/// How stop outputs are picked for a given input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    Categorical,
    Interval,
    Exponential,
}

impl FunctionKind {
    /// Explicit `type` wins, then the schema, then exponential.
    fn resolve(
        parameters: &StopFunction,
        spec: &PropertySpec,
    ) -> Result<FunctionKind, String> {
        match parameters.kind.as_deref() {
            Some("categorical") => Ok(FunctionKind::Categorical),
            Some("interval") => Ok(FunctionKind::Interval),
            Some("exponential") => Ok(FunctionKind::Exponential),
            Some(other) => Err(other.to_string()),
            None if spec.function.is_some() && !spec.is_interpolated() => {
                Ok(FunctionKind::Interval)
            }
            None => Ok(FunctionKind::Exponential),
        }
    }
}

/// Converts a legacy function object for a property with the given schema.
///
/// Schema problems (an unsupported color space, an unknown function kind, a
/// definition that does not deserialize) are returned immediately.
#[tracing::instrument(level = "debug", skip_all, fields(property_type = %spec.type_name))]
pub fn convert_function(parameters: &Value, spec: &PropertySpec) -> Result<Value, ConvertError> {
    let mut parameters: StopFunction = serde_json::from_value(parameters.clone())
        .map_err(|e| ConvertError::InvalidDefinition(e.to_string()))?;

    let default = match parameters.default.take().or_else(|| spec.default.clone()) {
        Some(value) => convert_value(&value, spec),
        None => json!(["error", NO_DEFAULT]),
    };
    parameters.default = Some(default.clone());

    let Some(stops) = parameters.stops.take() else {
        let Some(property) = parameters.property.clone() else {
            return Err(ConvertError::InvalidDefinition(
                "a function without stops needs a property".to_string(),
            ));
        };
        tracing::trace!(%property, "identity function");
        return Ok(json!(["coalesce", annotate(json!(["get", property]), spec), default]));
    };
    let Some((first_input, _)) = stops.first() else {
        return Err(ConvertError::InvalidDefinition("stops must not be empty".to_string()));
    };

    let zoom_and_property = first_input.is_object();
    let property_dependent = zoom_and_property || parameters.property.is_some();

    if let Some(space) = parameters.color_space.as_deref() {
        if space != "rgb" {
            return Err(ConvertError::UnsupportedColorSpace(space.to_string()));
        }
    }

    parameters.stops = Some(
        stops
            .into_iter()
            .map(|(input, output)| (input, convert_value(&output, spec)))
            .collect(),
    );

    let expression = if zoom_and_property {
        tracing::debug!("zoom-and-property function");
        convert_zoom_and_property_function(&parameters, spec)?
    } else if property_dependent {
        tracing::debug!("property function");
        convert_property_function(&parameters, spec)?
    } else {
        tracing::debug!("zoom function");
        convert_zoom_function(&parameters, spec)?
    };
    Ok(json!(["coalesce", expression, default]))
}

/// Wraps a constant so that it parses as the schema's type: colors go
/// through `parse-color`, arrays through `literal`.
pub fn convert_value(value: &Value, spec: &PropertySpec) -> Value {
    match spec.type_name.as_str() {
        "color" if Type::String.is_assignable(value) => json!(["parse-color", value]),
        "array" if Type::array(Type::Unknown, None).is_assignable(value) => {
            json!(["literal", value])
        }
        _ => value.clone(),
    }
}

/// Asserts a looked-up value to the schema's type.
fn annotate(value: Value, spec: &PropertySpec) -> Value {
    match spec.type_name.as_str() {
        "color" => json!(["parse-color", ["string", value]]),
        "array" => {
            let item = spec.value.as_deref();
            match (item, spec.length) {
                (Some(item), Some(n)) => json!(["array", item, n, value]),
                (None, Some(n)) => json!(["array", "value", n, value]),
                (Some(item), None) => json!(["array", item, value]),
                (None, None) => json!(["array", value]),
            }
        }
        "enum" => {
            let values = spec.enum_values();
            let allowed: serde_json::Map<String, Value> =
                values.iter().map(|v| (v.clone(), Value::Bool(true))).collect();
            json!([
                "let",
                "property_value",
                ["string", value],
                "enum_values",
                ["literal", allowed],
                [
                    "case",
                    ["has", ["var", "property_value"], ["var", "enum_values"]],
                    ["var", "property_value"],
                    ["error", format!("Expected value to be one of {}.", values.join(", "))]
                ]
            ])
        }
        other => json!([other, value]),
    }
}

fn convert_zoom_and_property_function(
    parameters: &StopFunction,
    spec: &PropertySpec,
) -> Result<Value, ConvertError> {
    let stops = parameters.stops.as_deref().unwrap_or_default();

    // One property sub-function per distinct zoom, in first-seen order.
    let mut zooms: Vec<(Value, Vec<(Value, Value)>)> = Vec::new();
    for (input, output) in stops {
        let zoom = input.get("zoom").cloned().unwrap_or(Value::Null);
        let value = input.get("value").cloned().unwrap_or(Value::Null);
        match zooms.iter_mut().find(|(z, _)| *z == zoom) {
            Some((_, group)) => group.push((value, output.clone())),
            None => zooms.push((zoom, vec![(value, output.clone())])),
        }
    }

    let interpolation = if spec.is_interpolated() {
        json!(["linear"])
    } else {
        json!(["step"])
    };
    let mut expression = vec![json!("curve"), interpolation, json!(["zoom"])];
    for (zoom, group) in zooms {
        let sub = StopFunction {
            stops: Some(group),
            ..parameters.clone()
        };
        expression.push(zoom);
        expression.push(convert_property_function(&sub, spec)?);
    }
    Ok(Value::Array(expression))
}

fn convert_property_function(
    parameters: &StopFunction,
    spec: &PropertySpec,
) -> Result<Value, ConvertError> {
    let kind = FunctionKind::resolve(parameters, spec)
        .map_err(ConvertError::UnknownPropertyFunctionType)?;
    let stops = parameters.stops.as_deref().unwrap_or_default();
    let default = parameters.default.clone().unwrap_or(Value::Null);
    let property = parameters.property.clone().unwrap_or_default();

    let Some((first, then)) = stops.first() else {
        return Err(ConvertError::InvalidDefinition("stops must not be empty".to_string()));
    };
    let input_type = match first {
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => return Err(ConvertError::UnsupportedStopInput("null")),
        Value::Array(_) => return Err(ConvertError::UnsupportedStopInput("array")),
        Value::Object(_) => return Err(ConvertError::UnsupportedStopInput("object")),
    };
    let input = json!([input_type, ["get", property]]);
    tracing::trace!(?kind, input_type, "property function");

    // Boolean inputs become a two-way `case`, unless an explicit non
    // categorical kind was asked for.
    if input_type == "boolean"
        && (kind == FunctionKind::Categorical || parameters.kind.is_none())
    {
        if stops.len() > 2 {
            return Err(ConvertError::TooManyBooleanStops(stops.len()));
        }
        let condition = if *first == Value::Bool(false) {
            json!(["!", input])
        } else {
            input
        };
        let otherwise = stops.get(1).map_or(default, |(_, output)| output.clone());
        return Ok(json!(["case", condition, then, otherwise]));
    }

    let mut expression = match kind {
        FunctionKind::Categorical => vec![json!("match"), input],
        FunctionKind::Interval => vec![json!("curve"), json!(["step"]), input],
        FunctionKind::Exponential => vec![
            json!("curve"),
            json!(["exponential", number_to_json(parameters.base.unwrap_or(1.0))]),
            input,
        ],
    };
    push_stops(&mut expression, stops);
    if kind == FunctionKind::Categorical {
        expression.push(default);
    }
    Ok(Value::Array(expression))
}

fn convert_zoom_function(
    parameters: &StopFunction,
    spec: &PropertySpec,
) -> Result<Value, ConvertError> {
    let kind = FunctionKind::resolve(parameters, spec)
        .map_err(ConvertError::UnknownZoomFunctionType)?;
    let mut expression = match kind {
        FunctionKind::Interval => vec![json!("curve"), json!(["step"]), json!(["zoom"])],
        FunctionKind::Exponential => vec![
            json!("curve"),
            json!(["exponential", number_to_json(parameters.base.unwrap_or(1.0))]),
            json!(["zoom"]),
        ],
        FunctionKind::Categorical => {
            return Err(ConvertError::UnknownZoomFunctionType("categorical".to_string()))
        }
    };
    push_stops(&mut expression, parameters.stops.as_deref().unwrap_or_default());
    Ok(Value::Array(expression))
}

fn push_stops(expression: &mut Vec<Value>, stops: &[(Value, Value)]) {
    for (input, output) in stops {
        expression.push(input.clone());
        expression.push(output.clone());
    }
}

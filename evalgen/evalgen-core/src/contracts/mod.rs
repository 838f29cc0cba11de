macro_rules! muse {
    ($module:ident, {$($item:ident),* $(,)?}) => {
        pub mod $module;
        pub use $module::{ $($item),* };
    };
}

muse!(content, {Content});
muse!(message, {ChatMessage});
muse!(model_output, {ModelOutput, CompletionChoice, ModelUsage, StopReason});

muse!(response_schema, {ResponseSchema, SchemaError});
muse!(guided_decoding, {GuidedDecoding, GuidedFormat, GuidedBackend, UnknownGuidedOption, guided_key});
muse!(generation_config, {GenerationConfig});
muse!(generate_request, {GenerateRequest});

use serde::{Serialize,Deserialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: Default> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::One(T::default())
    }
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item).iter(),
            OneOrMany::Many(items) => items.iter(),
        }
    }
}

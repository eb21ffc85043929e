mod assembly_ai_client;
mod google_speech_client;
mod hf_caption_client;
mod ninjas_ocr_client;
mod openai_client;

pub use assembly_ai_client::AssemblyAiClient;
pub use google_speech_client::GoogleSpeechClient;
pub use hf_caption_client::HfCaptionClient;
pub use ninjas_ocr_client::NinjasOcrClient;
pub use openai_client::OpenAiClient;

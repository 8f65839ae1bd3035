#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use cyphro_core::config::{AppConfig, PolicyError};
    use cyphro_core::moderation::{
        Bitmap, Classifier, ClassifierError, ImageDecoder, ImageError, ModerationService,
        ModerationSlot, Prediction,
    };
    use cyphro_core::pipeline::{ProcessError, ProcessOutcome, ProcessedFile, Processor};
    use cyphro_core::types::{Action, ErrorKind, TransferableFile};

    const PASSWORD: &str = "correct horse battery";

    /// Red images are unsafe, green ones fail, anything else is safe.
    struct ColorClassifier;

    impl Classifier for ColorClassifier {
        fn classify(&mut self, bitmap: &Bitmap) -> Result<Vec<Prediction>, ClassifierError> {
            match bitmap.pixels()[..3] {
                [255, 0, 0] => Ok(vec![Prediction::new("Porn", 0.93)]),
                [0, 255, 0] => Err(ClassifierError("unsupported colorspace".into())),
                _ => Ok(vec![Prediction::new("Neutral", 0.99)]),
            }
        }
    }

    /// "Decodes" the first three bytes as a solid RGB color.
    struct SolidDecoder;

    impl ImageDecoder for SolidDecoder {
        fn decode(&self, file: &TransferableFile) -> Result<Bitmap, ImageError> {
            let rgb = file.data.get(..3).ok_or_else(|| ImageError::Unsupported(file.name.clone()))?;
            let px: Vec<u8> = (0..16).flat_map(|_| [rgb[0], rgb[1], rgb[2], 255]).collect();
            Bitmap::new(4, 4, px)
        }
    }

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.codec.kdf_iterations = 10;
        config.bridge.min_duration = Duration::ZERO;
        config
    }

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn processor(moderated: bool) -> Processor {
        init_logging();
        let config = config();
        let service = moderated.then(|| {
            ModerationService::spawn(ColorClassifier, SolidDecoder, &config.moderation).unwrap()
        });
        Processor::new(config, service)
    }

    fn png(name: &str, rgb: [u8; 3]) -> TransferableFile {
        TransferableFile::new(name, "image/png", rgb.to_vec())
    }

    fn completed(outcome: ProcessOutcome) -> ProcessedFile {
        match outcome {
            ProcessOutcome::Completed(file) => file,
            other => panic!("expected completed outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_then_decode() {
        let p = processor(false);
        let source = TransferableFile::new("plan.txt", "text/plain", b"step one".to_vec());
        let enc = completed(p.process(Action::Encode, source, PASSWORD, None).unwrap());
        assert_eq!(enc.file_name, "plan.cph");

        let container = TransferableFile::new(enc.file_name, "", enc.data);
        let dec = completed(p.process(Action::Decode, container, PASSWORD, None).unwrap());
        assert_eq!(dec.file_name, "plan.txt");
        assert_eq!(&dec.data[..], b"step one");
        assert!(!dec.was_disguised);
    }

    #[test]
    fn test_disguised_decode_reports_disguise() {
        let p = processor(false);
        let source = TransferableFile::new("plan.txt", "text/plain", b"step one".to_vec());
        let cover = png("sunset.png", [10, 20, 30]);
        let enc = completed(p.process(Action::Encode, source, PASSWORD, Some(cover)).unwrap());
        assert_eq!(enc.file_name, "sunset.png");

        let container = TransferableFile::new(enc.file_name, "image/png", enc.data);
        let dec = completed(p.process(Action::Decode, container, PASSWORD, None).unwrap());
        assert!(dec.was_disguised);
        assert_eq!(dec.file_name, "plan.txt");
    }

    #[test]
    fn test_password_policy() {
        let p = processor(false);
        let source = TransferableFile::new("a.txt", "text/plain", b"abc".to_vec());
        let err = p.process(Action::Encode, source, "short", None).unwrap_err();
        assert!(matches!(err, ProcessError::Policy(PolicyError::PasswordTooShort { min: 8 })));
        assert_eq!(err.kind(), Some(ErrorKind::Validation));
        assert_eq!(err.user_message(Action::Encode), "Password must contain at least 8 characters.");
    }

    #[test]
    fn test_unsafe_content_blocks_encode() {
        let p = processor(true);
        let source = png("a.png", [255, 0, 0]);
        let cover = png("b.png", [1, 2, 3]);
        p.select(&source, Some(&cover));

        let outcome = p.process(Action::Encode, source, PASSWORD, Some(cover)).unwrap();
        assert_eq!(outcome, ProcessOutcome::Blocked(vec![ModerationSlot::Source]));
        assert_eq!(
            outcome.blocked_message().unwrap(),
            "Uploaded source file must not contain inappropriate content."
        );
    }

    #[test]
    fn test_unsafe_source_with_non_image_disguise() {
        let p = processor(true);
        let source = png("a.png", [255, 0, 0]);
        let cover = TransferableFile::new("song.mp3", "audio/mpeg", b"ID3 not an image".to_vec());
        p.select(&source, Some(&cover));

        let outcome = p.process(Action::Encode, source, PASSWORD, Some(cover)).unwrap();
        assert_eq!(outcome, ProcessOutcome::Blocked(vec![ModerationSlot::Source]));
    }

    #[test]
    fn test_non_image_source_with_unsafe_disguise() {
        let p = processor(true);
        let source = TransferableFile::new("notes.txt", "text/plain", b"hello".to_vec());
        let cover = png("b.png", [255, 0, 0]);
        p.select(&source, Some(&cover));

        let outcome = p.process(Action::Encode, source, PASSWORD, Some(cover)).unwrap();
        assert_eq!(outcome, ProcessOutcome::Blocked(vec![ModerationSlot::Disguise]));
    }

    #[test]
    fn test_new_source_clears_previous_verdict() {
        let p = processor(true);
        let image = png("a.png", [255, 0, 0]);
        p.select(&image, None);
        let outcome = p.process(Action::Encode, image, PASSWORD, None).unwrap();
        assert!(outcome.blocked_message().is_some());

        let text = TransferableFile::new("notes.txt", "text/plain", b"hello".to_vec());
        p.select(&text, None);
        assert!(p.moderation().unwrap().handle(ModerationSlot::Source).is_none());

        let file = completed(p.process(Action::Encode, text, PASSWORD, None).unwrap());
        assert_eq!(file.file_name, "notes.cph");
    }

    #[test]
    fn test_both_unsafe() {
        let p = processor(true);
        let source = png("a.png", [255, 0, 0]);
        let cover = png("b.png", [255, 0, 0]);
        p.select(&source, Some(&cover));

        let outcome = p.process(Action::Encode, source, PASSWORD, Some(cover)).unwrap();
        assert_eq!(
            outcome.blocked_message().unwrap(),
            "Uploaded source and disguise files must not contain inappropriate content."
        );
    }

    #[test]
    fn test_moderation_error_fails_open() {
        let p = processor(true);
        let source = png("a.png", [0, 255, 0]);
        p.select(&source, None);

        let file = completed(p.process(Action::Encode, source, PASSWORD, None).unwrap());
        assert_eq!(file.file_name, "a.cph");
    }

    #[test]
    fn test_unmoderated_files_proceed() {
        let p = processor(true);
        let source = TransferableFile::new("a.txt", "text/plain", vec![255, 0, 0]);
        p.select(&source, None);

        assert!(matches!(p.process(Action::Encode, source, PASSWORD, None).unwrap(), ProcessOutcome::Completed(_)));
    }

    #[test]
    fn test_decode_skips_moderation() {
        let p = processor(true);
        let enc = completed(
            p.process(Action::Encode, TransferableFile::new("a.txt", "text/plain", vec![255, 0, 0]), PASSWORD, None)
                .unwrap(),
        );
        // an unsafe verdict on the source slot must not affect decoding
        let red = png("red.png", [255, 0, 0]);
        p.select(&red, None);
        p.moderation().unwrap().wait(&[ModerationSlot::Source]).unwrap();

        let container = TransferableFile::new(enc.file_name, "", enc.data);
        assert!(matches!(p.process(Action::Decode, container, PASSWORD, None).unwrap(), ProcessOutcome::Completed(_)));
    }

    #[test]
    fn test_wrong_password_message() {
        let p = processor(false);
        let enc = completed(
            p.process(Action::Encode, TransferableFile::new("a.txt", "", b"abc".to_vec()), PASSWORD, None).unwrap(),
        );
        let container = TransferableFile::new(enc.file_name, "", enc.data);
        let err = p.process(Action::Decode, container, "another password", None).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Authentication));
        assert_eq!(
            err.user_message(Action::Decode),
            "Check that the password or key is correct and make sure the file is not damaged."
        );
    }

    #[test]
    fn test_output_size_policy() {
        let mut config = config();
        config.codec.policy.max_files_size = 100;
        let p = Processor::new(config, None);

        let source = TransferableFile::new("a.txt", "", vec![7u8; 90]);
        let err = p.process(Action::Encode, source, PASSWORD, None).unwrap_err();
        assert!(matches!(err, ProcessError::Policy(PolicyError::TooLarge { .. })));
    }

    #[test]
    fn test_minimum_duration() {
        let mut config = config();
        config.bridge.min_duration = Duration::from_millis(150);
        let p = Processor::new(config, None);

        let started = Instant::now();
        let _ = p.process(Action::Decode, TransferableFile::new("x.cph", "", vec![0u8; 4]), PASSWORD, None);
        assert!(started.elapsed() >= Duration::from_millis(150));
    }
}

pub mod blurring {
    pub mod domain {
        pub mod frame_blurrer;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod generate_frames_use_case;
    pub mod pipeline_logger;
    pub mod render_spoiler_use_case;
}

pub mod shared {
    pub mod constants;
    pub mod error;
    pub mod frame;
    pub mod spoiler_config;
}

pub mod shimmer {
    pub mod domain {
        pub mod alpha_blend;
        pub mod even_padding;
        pub mod frame_compositor;
        pub mod shimmer_dot;
    }
}

pub mod video {
    pub mod domain {
        pub mod image_reader;
        pub mod image_writer;
        pub mod video_encoder;
    }
    pub mod infrastructure {
        pub mod ffmpeg_cli_encoder;
        pub mod image_file_reader;
        pub mod image_file_writer;
    }
}

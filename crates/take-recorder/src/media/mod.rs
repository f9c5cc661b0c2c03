mod trim;
mod waveform;
mod wav;

pub(crate) use {
    trim::WavTrimCodec,
    waveform::WaveformFrameDecoder,
    wav::{WAV_MIME, decode_wav, encode_pcm, encode_wav},
};

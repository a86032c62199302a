mod tests {
    use adalight_smooth::channel::{Channel, TryReceiveError};

    #[test]
    fn test_receive_in_order() {
        let channel: Channel<u8, 4> = Channel::new();
        let sender = channel.sender();
        let receiver = channel.receiver();
        assert_eq!(receiver.try_receive(), Err(TryReceiveError));

        assert_eq!(sender.publish(1), None);
        assert_eq!(sender.publish(2), None);
        assert_eq!(channel.len(), 2);
        assert_eq!(receiver.try_receive(), Ok(1));
        assert_eq!(receiver.try_receive(), Ok(2));
        assert!(channel.is_empty());
    }

    #[test]
    fn test_full_channel_evicts_oldest() {
        let channel: Channel<u8, 2> = Channel::new();
        assert_eq!(channel.publish(1), None);
        assert_eq!(channel.publish(2), None);
        assert_eq!(channel.publish(3), Some(1));
        assert_eq!(channel.try_receive(), Ok(2));
        assert_eq!(channel.try_receive(), Ok(3));
    }

    #[test]
    fn test_clear() {
        let channel: Channel<u8, 2> = Channel::new();
        channel.publish(1);
        channel.clear();
        assert_eq!(channel.try_receive(), Err(TryReceiveError));
    }
}
